/// Display version information
pub fn execute() {
    println!("safefolks {}", env!("CARGO_PKG_VERSION"));
    println!("Trust-recording Telegram bot for SafeFolks groups");
}
