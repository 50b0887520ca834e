pub mod chain;

pub use chain::{CertificateChain, ChainError, ParsedCertificate, pem_blocks, split_joined_blocks};
