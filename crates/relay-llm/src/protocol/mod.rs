//! Wire format types for the chat-completion API
//!
//! Pure serde structs matching the provider's JSON. They exist only at the
//! transport boundary; everything else works on [`crate::types`].

pub mod openai;
