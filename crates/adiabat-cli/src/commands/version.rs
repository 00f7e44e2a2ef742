//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - dense adiabatic quantum evolution",
        style("adiabat").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  adiabat-sim  Hamiltonians, schedules, integrator and diagnostics");
    println!("  adiabat-cli  Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
