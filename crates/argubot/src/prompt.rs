//! Prompt rendering helpers built on `minijinja`.

use minijinja::Environment;
use serde::Serialize;

/// Renders a prompt from a template string and a serializable context.
///
/// This is the underlying function for the `prompt!` macro.
pub fn render_prompt<T: Serialize>(template: &str, context: T) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("prompt", template)?;
    let tmpl = env.get_template("prompt")?;
    tmpl.render(context)
}

/// Creates a prompt string from a template and key-value pairs.
///
/// # Example
///
/// ```
/// use argubot::prompt;
///
/// let p = prompt!(
///     "Hello {{ name }}! Here is a conversation you had with {{ others }}.",
///     name = "Bob",
///     others = "Alice"
/// ).unwrap();
///
/// assert_eq!(p, "Hello Bob! Here is a conversation you had with Alice.");
/// ```
#[macro_export]
macro_rules! prompt {
    ($template:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::prompt::render_prompt($template, $crate::__minijinja::context!($($key => $value),*))
    };
}

/// Joins names into an English list: `"A"`, `"A and B"`, `"A, B, and C"`.
///
/// An empty list yields `zero`, e.g. `"yourself"`.
///
/// ```
/// use argubot::prompt::conjunction;
///
/// assert_eq!(conjunction(&["Alice", "Bob", "Cara"], "nobody"), "Alice, Bob, and Cara");
/// assert_eq!(conjunction::<&str>(&[], "yourself"), "yourself");
/// ```
pub fn conjunction<S: AsRef<str>>(items: &[S], zero: &str) -> String {
    match items {
        [] => zero.to_string(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|item| item.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{head}, and {}", last.as_ref())
        }
    }
}
