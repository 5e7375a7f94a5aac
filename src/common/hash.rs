use sha2::{Digest as ShaDigest, Sha512};

pub type Digest = [u8; 64];

pub trait Hashable {
    fn hash(&self) -> Digest;
}

/// Digest of an ordered list of transaction ids.
pub fn digest_ids(ids: &[u64]) -> Digest {
    let mut hasher = Sha512::new();
    hasher.update((ids.len() as u64).to_be_bytes());
    for id in ids {
        hasher.update(id.to_be_bytes());
    }
    finalize(hasher)
}

/// Digest over a sequence of digests, order-sensitive.
pub fn digest_all<'a>(digests: impl IntoIterator<Item = &'a Digest>) -> Digest {
    let mut hasher = Sha512::new();
    for digest in digests {
        hasher.update(digest);
    }
    finalize(hasher)
}

/// Short hex prefix for logs and reports.
pub fn short_hex(digest: &Digest) -> String {
    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}

fn finalize(hasher: Sha512) -> Digest {
    let result = hasher.finalize();
    let mut digest = [0u8; 64];
    digest.copy_from_slice(&result[..]);
    digest
}
