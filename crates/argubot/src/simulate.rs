//! Simulated conversations between two agents.

use crate::agent::{Agent, AgentError};
use crate::dialogue::Dialogue;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Runs turn-by-turn conversations between two agents.
///
/// The first agent speaks first, after any `prefix`. When `use_starter` is
/// on and the second agent has conversation starters, the first agent opens
/// with one of them instead of generating its own first turn. This suits an
/// argubot talking to a [`CharacterAgent`](crate::agent::CharacterAgent).
///
/// # Example
///
/// ```rust
/// use argubot::agent::ConstantAgent;
/// use argubot::simulate::Simulator;
///
/// # async fn example() -> Result<(), argubot::agent::AgentError> {
/// let alice = ConstantAgent::new("Alice", "Hello.");
/// let bob = ConstantAgent::new("Bob", "Hi.");
/// let d = Simulator::new().with_seed(7).simulate(&alice, &bob, 3).await?;
/// assert_eq!(d.speakers(), vec!["Alice", "Bob"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    prefix: Dialogue,
    use_starter: bool,
    rng: StdRng,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            prefix: Dialogue::new(),
            use_starter: true,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Turns that precede the simulated ones. They do not count toward `turns`.
    pub fn with_prefix(mut self, prefix: Dialogue) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_starter(mut self, use_starter: bool) -> Self {
        self.use_starter = use_starter;
        self
    }

    pub fn without_starter(self) -> Self {
        self.with_starter(false)
    }

    /// Simulates `turns` turns, alternating between `a` and `b`, `a` first.
    ///
    /// Any agent error ends the simulation and is returned as is.
    pub async fn simulate(
        &mut self,
        a: &dyn Agent,
        b: &dyn Agent,
        mut turns: usize,
    ) -> Result<Dialogue, AgentError> {
        let (mut a, mut b) = (a, b);
        let mut d = self.prefix.clone();

        if self.use_starter && turns > 0 {
            let starter = b
                .conversation_starters()
                .and_then(|starters| starters.choose(&mut self.rng));
            if let Some(starter) = starter {
                tracing::debug!(speaker = a.name(), content = %starter, "opening with conversation starter");
                d = d.with_turn(a.name(), starter.clone());
                turns -= 1;
                std::mem::swap(&mut a, &mut b);
            }
        }

        while turns > 0 {
            d = a.respond(&d).await?;
            turns -= 1;
            std::mem::swap(&mut a, &mut b);
        }

        tracing::info!(turns = d.len(), speakers = ?d.speakers(), "finished simulated dialogue");
        Ok(d)
    }
}

/// Simulates `turns` turns between `a` and `b` with a default [`Simulator`].
pub async fn simulated_dialogue(
    a: &dyn Agent,
    b: &dyn Agent,
    turns: usize,
) -> Result<Dialogue, AgentError> {
    Simulator::new().simulate(a, b, turns).await
}
