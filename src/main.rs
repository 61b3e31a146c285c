use std::process::ExitCode;

fn main() -> ExitCode {
    match sketchport::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err.kind();
            eprintln!("error[{}]: {err}", kind.as_str());
            ExitCode::from(kind.exit_code() as u8)
        }
    }
}
