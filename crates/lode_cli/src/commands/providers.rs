//! Providers command implementation.

use lode_io::ProviderRegistry;

/// Runs the providers command.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ProviderRegistry::builtin();

    println!("Registered backend providers");
    println!("============================");
    for name in registry.names() {
        let readonly = registry.get(name).is_some_and(|p| p.is_readonly());
        if readonly {
            println!("  {name} (read-only)");
        } else {
            println!("  {name}");
        }
    }

    Ok(())
}
