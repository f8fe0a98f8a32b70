use proptest::prelude::*;
use seedkey::entropy::{Coordinates, EntropyPool, POOL_READY_LEN};
use seedkey::{
    derive_address, entropy_to_mnemonic, make_mnemonic_from_entropy_sha, mnemonic_to_entropy,
    Address,
};

proptest! {
    #[test]
    fn mnemonic_roundtrips_any_entropy(entropy in prop::array::uniform16(any::<u8>())) {
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        let phrase = mnemonic.to_string();
        prop_assert_eq!(phrase.split(' ').count(), 12);
        prop_assert_eq!(mnemonic_to_entropy(&phrase).unwrap(), entropy);
    }

    #[test]
    fn digest_mnemonic_uses_leading_bytes(digest in prop::array::uniform32(any::<u8>())) {
        let digest_hex = hex::encode(digest);
        let entropy = make_mnemonic_from_entropy_sha(&digest_hex).unwrap().to_entropy();
        prop_assert_eq!(&entropy[..], &digest[..16]);
    }

    #[test]
    fn addresses_are_56_lowercase_hex(pem in ".{0,200}") {
        let address = derive_address(&pem);
        prop_assert_eq!(address.as_str().len(), 56);
        prop_assert_eq!(Address::parse(address.as_str()).unwrap(), address.clone());
        prop_assert!(address.matches(&pem));
    }

    #[test]
    fn pool_readiness_tracks_length(points in prop::collection::vec((any::<u32>(), any::<u32>()), 0..80)) {
        let mut pool = EntropyPool::new();
        for (x, y) in &points {
            pool.sample(&Coordinates::new(*x, *y));
        }
        // 6 coordinate bytes plus 2 jitter bytes per sample
        prop_assert_eq!(pool.len(), points.len() * 8);
        prop_assert_eq!(pool.is_ready(), pool.len() >= POOL_READY_LEN);
        prop_assert_eq!(pool.digest().is_ok(), pool.is_ready());
    }
}
