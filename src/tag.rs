//! Outbound tag generation.
//!
//! Tags key the selector and urltest groups, so they must be unique within
//! one conversion batch. All state is call-scoped: concurrent conversions
//! each carry their own generator.

use std::collections::HashMap;

use uuid::Uuid;

use crate::parser::Protocol;

/// Generates a unique tag per converted outbound.
///
/// Without a prefix, tags are `<protocol>-<8 hex chars>`; with one, tags are
/// `<prefix>-<protocol>-<n>` with the counter incremented per protocol,
/// starting at 1 and reset for every new generator.
pub struct TagGenerator {
    prefix: Option<String>,
    counters: HashMap<Protocol, u32>,
}

impl TagGenerator {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            counters: HashMap::new(),
        }
    }

    /// Produce the next tag for an outbound of the given protocol.
    pub fn next(&mut self, protocol: Protocol) -> String {
        match &self.prefix {
            Some(prefix) => {
                let counter = self.counters.entry(protocol).or_insert(0);
                *counter += 1;
                format!("{}-{}-{}", prefix, protocol.tag_name(), counter)
            }
            None => format!("{}-{}", protocol.tag_name(), random_suffix()),
        }
    }
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
