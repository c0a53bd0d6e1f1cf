pub mod cipher;
pub mod kdf;

pub use self::cipher::VaultCipher;
pub use self::kdf::KeyDerivation;
