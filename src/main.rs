use std::process::{ExitCode, Termination};

pub enum Exit<T> {
    Ok,
    Err(T),
}

impl<T: Into<u8> + std::fmt::Display> Termination for Exit<T> {
    fn report(self) -> ExitCode {
        match self {
            Exit::Ok => ExitCode::SUCCESS,
            Exit::Err(err) => {
                eprintln!("Error: {}", err);
                ExitCode::from(err.into())
            },
        }
    }
}

#[async_std::main]
async fn main() -> Exit<album_mirror::Error> {
    match album_mirror::main().await {
        Ok(_) => Exit::Ok,
        Err(err) => Exit::Err(err),
    }
}
