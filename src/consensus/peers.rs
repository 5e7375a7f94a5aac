/// Followees this node no longer trusts, indexed by node.
///
/// Entries can only be marked, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    members: Vec<bool>,
}

impl Blacklist {
    pub fn new(len: usize) -> Self {
        Blacklist {
            members: vec![false; len],
        }
    }

    /// Returns true if the peer was not blacklisted before.
    pub fn mark(&mut self, peer: usize) -> bool {
        match self.members.get_mut(peer) {
            Some(entry) if !*entry => {
                *entry = true;
                true
            }
            _ => false,
        }
    }

    /// Out of range peers are never blacklisted.
    pub fn contains(&self, peer: usize) -> bool {
        self.members.get(peer).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn count(&self) -> usize {
        self.members.iter().filter(|m| **m).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_permanent() {
        let mut blacklist = Blacklist::new(3);
        assert!(!blacklist.contains(1));

        assert!(blacklist.mark(1));
        assert!(!blacklist.mark(1));
        assert!(blacklist.contains(1));
        assert_eq!(blacklist.count(), 1);
        assert_eq!(blacklist.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_out_of_range_peer() {
        let mut blacklist = Blacklist::new(2);
        assert!(!blacklist.mark(5));
        assert!(!blacklist.contains(5));
        assert_eq!(blacklist.count(), 0);
    }
}
