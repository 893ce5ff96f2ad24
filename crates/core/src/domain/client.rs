use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
}

/// Who a sale is for: a registered client record, or a walk-in customer
/// known only by name. The two are mutually exclusive by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRef {
    Registered(ClientId),
    WalkIn(String),
}

#[cfg(test)]
mod tests {
    use super::{Client, ClientId, ClientRef};

    #[test]
    fn registered_and_walk_in_are_distinct() {
        let registered = ClientRef::Registered(ClientId(7));
        let walk_in = ClientRef::WalkIn("Maria Lopez".to_owned());
        assert_ne!(registered, walk_in);
    }

    #[test]
    fn client_equality_is_by_id_and_name() {
        let a = Client { id: ClientId(1), name: "Ana".to_owned() };
        let b = Client { id: ClientId(1), name: "Ana".to_owned() };
        assert_eq!(a, b);
    }
}
