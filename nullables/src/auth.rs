//! Nullable authorizer: an in-memory role table.

use std::collections::HashSet;
use std::sync::Mutex;
use vota_governance::{Authorizer, Role};
use vota_types::Address;

#[derive(Default)]
pub struct NullAuthorizer {
    grants: Mutex<HashSet<(Role, Address)>>,
}

impl NullAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style grant for test setup.
    pub fn with(self, role: Role, who: Address) -> Self {
        self.grant(role, who);
        self
    }

    pub fn grant(&self, role: Role, who: Address) {
        self.grants.lock().unwrap().insert((role, who));
    }

    pub fn revoke(&self, role: Role, who: &Address) {
        self.grants.lock().unwrap().remove(&(role, *who));
    }
}

impl Authorizer for NullAuthorizer {
    fn has_role(&self, role: Role, who: &Address) -> bool {
        self.grants.lock().unwrap().contains(&(role, *who))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_revoke() {
        let alice = Address::new([1; 20]);
        let auth = NullAuthorizer::new().with(Role::Admin, alice);
        assert!(auth.has_role(Role::Admin, &alice));
        assert!(!auth.has_role(Role::Executor, &alice));
        assert!(auth.has_any_role(&[Role::Executor, Role::Admin], &alice));

        auth.revoke(Role::Admin, &alice);
        assert!(!auth.has_role(Role::Admin, &alice));
    }
}
