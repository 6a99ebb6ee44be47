use thiserror::Error;

/// Key and address handling errors local to the wallet crate
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    #[error("address error: {0}")]
    Address(String),

    #[error("signing error: {0}")]
    Signing(String),
}

// Wallet failures surface to the pipeline as validation errors: they mean
// the request could never have been well-formed, not that the network broke.
impl From<WalletError> for rosetta_core::Error {
    fn from(err: WalletError) -> Self {
        rosetta_core::Error::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_validation() {
        let err: rosetta_core::Error = WalletError::Signing("bad payload".into()).into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("bad payload"));
    }
}
