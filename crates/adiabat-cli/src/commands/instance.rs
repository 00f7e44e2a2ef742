//! Instance command implementation.
//!
//! Generate a random k-SAT instance and report whether it is satisfiable.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use adiabat_sim::hamiltonian::MAX_DENSE_QUBITS;
use adiabat_sim::problems::random_instance;

/// Execute the instance command.
pub fn execute(
    num_variables: usize,
    num_clauses: usize,
    k: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    if num_variables > MAX_DENSE_QUBITS {
        anyhow::bail!(
            "At most {MAX_DENSE_QUBITS} variables are supported, got {num_variables}"
        );
    }
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let instance = random_instance(num_variables, num_clauses, k, &mut rng)
        .map_err(|e| anyhow::anyhow!("Failed to generate instance: {e}"))?;

    if json {
        let json = serde_json::to_string_pretty(&instance)
            .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!("c seed {seed}");
    print!("{instance}");

    let solutions = instance.satisfying_assignments();
    if solutions.is_empty() {
        println!("\n{} unsatisfiable", style("✗").red().bold());
    } else {
        println!(
            "\n{} satisfiable ({} of {} assignments)",
            style("✓").green().bold(),
            solutions.len(),
            1usize << num_variables
        );
        for assignment in solutions.iter().take(8) {
            let bits: String = assignment
                .iter()
                .map(|&b| if b { '1' } else { '0' })
                .collect();
            println!("  {}", style(bits).cyan());
        }
        if solutions.len() > 8 {
            println!("  ... and {} more", solutions.len() - 8);
        }
    }

    Ok(())
}
