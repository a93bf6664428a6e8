pub mod credentials;
pub mod labels;
pub mod publish;
