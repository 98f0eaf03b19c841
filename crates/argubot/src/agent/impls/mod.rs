//! Concrete agent implementations.

pub mod akiki;
pub mod character;
pub mod constant;
pub mod kialo;
pub mod llm;

pub use akiki::AkikiAgent;
pub use character::CharacterAgent;
pub use constant::ConstantAgent;
pub use kialo::KialoAgent;
pub use llm::LLMAgent;
