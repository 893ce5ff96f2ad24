//! Deciding who a sale is for.
//!
//! The resolver mirrors a two-mode form: in *existing* mode the text box
//! searches the registered client directory and a pick locks the client;
//! in walk-in mode the text box is simply the customer's name. The lock is
//! tied to the text: editing after a pick unlocks and reopens the search.

use crate::domain::client::{Client, ClientRef};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientResolver {
    existing: bool,
    text: String,
    locked: Option<Client>,
}

impl Default for ClientResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientResolver {
    /// Starts in existing-client mode with nothing typed or locked.
    pub fn new() -> Self {
        Self { existing: true, text: String::new(), locked: None }
    }

    pub fn is_existing_mode(&self) -> bool {
        self.existing
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn locked(&self) -> Option<&Client> {
        self.locked.as_ref()
    }

    /// Whether the text should be driving a directory search right now:
    /// existing mode, no lock, something typed.
    pub fn wants_search(&self) -> bool {
        self.existing && self.locked.is_none() && !self.text.trim().is_empty()
    }

    /// Switches between existing-client and walk-in mode. Any lock and
    /// typed text belong to the old mode and are dropped.
    pub fn set_existing_mode(&mut self, existing: bool) {
        if self.existing == existing {
            return;
        }
        self.existing = existing;
        self.text.clear();
        self.locked = None;
    }

    /// Records what the user typed. In existing mode this invalidates any
    /// previous pick, because the text no longer names it.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.existing {
            self.locked = None;
        }
    }

    /// Locks a directory candidate and mirrors its name into the text box.
    /// Only meaningful in existing mode; ignored otherwise.
    pub fn select(&mut self, client: Client) {
        if !self.existing {
            return;
        }
        self.text = client.name.clone();
        self.locked = Some(client);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.locked = None;
    }

    /// The client reference a submission would carry, if any. Existing mode
    /// resolves only through a lock; walk-in mode resolves through a
    /// non-blank name.
    pub fn resolved_ref(&self) -> Option<ClientRef> {
        if self.existing {
            return self.locked.as_ref().map(|client| ClientRef::Registered(client.id));
        }
        let name = self.text.trim();
        if name.is_empty() {
            None
        } else {
            Some(ClientRef::WalkIn(name.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientResolver;
    use crate::domain::client::{Client, ClientId, ClientRef};

    fn client() -> Client {
        Client { id: ClientId(7), name: "Maria Lopez".to_owned() }
    }

    #[test]
    fn selecting_a_candidate_locks_and_mirrors_the_name() {
        let mut resolver = ClientResolver::new();
        resolver.input("mar");
        resolver.select(client());

        assert_eq!(resolver.text(), "Maria Lopez");
        assert_eq!(resolver.resolved_ref(), Some(ClientRef::Registered(ClientId(7))));
        assert!(!resolver.wants_search());
    }

    #[test]
    fn typing_after_a_pick_unlocks_and_reopens_search() {
        let mut resolver = ClientResolver::new();
        resolver.select(client());
        resolver.input("Maria Lo");

        assert!(resolver.locked().is_none());
        assert_eq!(resolver.resolved_ref(), None);
        assert!(resolver.wants_search());
    }

    #[test]
    fn walk_in_mode_resolves_through_the_typed_name() {
        let mut resolver = ClientResolver::new();
        resolver.set_existing_mode(false);
        resolver.input("  Pedro Sanchez  ");

        assert_eq!(
            resolver.resolved_ref(),
            Some(ClientRef::WalkIn("Pedro Sanchez".to_owned()))
        );
        assert!(!resolver.wants_search());
    }

    #[test]
    fn blank_walk_in_name_does_not_resolve() {
        let mut resolver = ClientResolver::new();
        resolver.set_existing_mode(false);
        resolver.input("   ");
        assert_eq!(resolver.resolved_ref(), None);
    }

    #[test]
    fn toggling_mode_drops_lock_and_text() {
        let mut resolver = ClientResolver::new();
        resolver.select(client());
        resolver.set_existing_mode(false);

        assert!(resolver.locked().is_none());
        assert!(resolver.text().is_empty());
        assert_eq!(resolver.resolved_ref(), None);
    }

    #[test]
    fn toggling_to_the_current_mode_changes_nothing() {
        let mut resolver = ClientResolver::new();
        resolver.select(client());
        resolver.set_existing_mode(true);
        assert!(resolver.locked().is_some());
    }

    #[test]
    fn selecting_is_ignored_in_walk_in_mode() {
        let mut resolver = ClientResolver::new();
        resolver.set_existing_mode(false);
        resolver.select(client());
        assert!(resolver.locked().is_none());
    }

    #[test]
    fn typed_text_without_a_pick_leaves_the_sale_unresolved() {
        let mut resolver = ClientResolver::new();
        resolver.input("maria");
        assert_eq!(resolver.resolved_ref(), None);
        assert!(resolver.wants_search());
    }
}
