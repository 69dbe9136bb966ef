use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not read configuration")]
    Figment,
    #[display("no home directory available to place defaults under")]
    NoHomeDirectory,
}
