//! RoFreeze: freeze the mouse cursor at a chosen point.

#[cfg(target_os = "windows")]
mod windows_main;

fn main() {
    rofreeze::logging::init();

    #[cfg(target_os = "windows")]
    {
        if let Err(err) = windows_main::run() {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        tracing::error!(
            os = std::env::consts::OS,
            "unsupported platform, RoFreeze only runs on Windows"
        );
        std::process::exit(1);
    }
}
