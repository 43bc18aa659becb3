pub mod assert;
pub mod create;
pub mod decrypt;
pub mod echo;
pub mod encrypt;
pub mod enumerate;
pub mod init;
pub mod nick;
pub mod pub_key;
pub mod sign;
pub mod unwrap;
pub mod verify;
pub mod version;
pub mod wrap;

pub use assert::Assert;
pub use create::Create;
pub use decrypt::Decrypt;
pub use echo::Echo;
pub use encrypt::Encrypt;
pub use enumerate::Enumerate;
pub use init::Init;
pub use nick::Nick;
pub use pub_key::Pub;
pub use sign::Sign;
pub use unwrap::Unwrap;
pub use verify::Verify;
pub use version::Version;
pub use wrap::Wrap;
