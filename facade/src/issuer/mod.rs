mod acm;
mod pca;

pub use acm::AcmIssuer;
pub use pca::PcaIssuer;
