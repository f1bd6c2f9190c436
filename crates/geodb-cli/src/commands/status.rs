use geodb::{HookConfig, read_token};

/// Print where the active database lives and which hash it was synced at.
pub fn run(config: &HookConfig) {
    let layout = config.layout();
    let database = layout.database();

    println!("Database: {}", database.display());
    if database.is_file() {
        println!("Present:  yes");
    } else {
        println!("Present:  no");
    }
    println!(
        "Hash:     {}",
        read_token(&layout.hash_file()).unwrap_or_else(|| "none".into())
    );
    println!("License:  {}", license_state(config));
}

/// Blank keys are treated the same as no key, matching what a sync accepts.
fn license_state(config: &HookConfig) -> &'static str {
    if config.license_key().is_some() {
        "configured"
    } else {
        "missing"
    }
}
