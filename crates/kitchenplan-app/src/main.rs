//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    use kitchenplan_app::{prepare_editor, run_session, App, AppConfig, SessionArgs};

    env_logger::init();
    log::info!("Starting KitchenPlan");

    let result = SessionArgs::parse(std::env::args().skip(1)).and_then(|args| {
        if args.headless {
            let summary = run_session(&args, AppConfig::from_env())?;
            log::debug!("{:?}", summary);
            Ok(())
        } else {
            App::new(prepare_editor(&args, AppConfig::from_env())?).run()
        }
    });
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
