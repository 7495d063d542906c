use std::process;

#[tokio::main]
async fn main() {
    let exit_code = kokaq_shell::run().await;
    // The stdin reader thread may still be blocked on a read; leave without joining it.
    process::exit(exit_code);
}
