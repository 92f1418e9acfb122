use std::process::ExitCode;

fn main() -> ExitCode {
    obligacje_view::app::init_tracing();

    match obligacje_view::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
