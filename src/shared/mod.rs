//! Cross-cutting helpers

pub mod shutdown;
