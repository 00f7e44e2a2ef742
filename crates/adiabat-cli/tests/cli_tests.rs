//! CLI configuration and report tests.
//!
//! The CLI is a binary crate, so these tests drive the library calls the
//! commands are built on: configuration files, instance generation and
//! JSON reports.

// ============================================================================
// Configuration files
// ============================================================================

mod config_files {
    use std::io::Write;

    use adiabat_sim::config::{ConfigError, ProblemConfig, RunConfig};
    use adiabat_sim::pauli::PauliOp;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_ising_file() {
        let file = write_yaml(
            "problem:\n  kind: ising\n  n: 4\n  coupling: -1.0\n  field: 0.3\nschedule:\n  rate: 0.2\n",
        );
        let config = RunConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.problem,
            ProblemConfig::Ising {
                n: 4,
                coupling: -1.0,
                field: 0.3
            }
        );
        assert_eq!(config.schedule.rate, 0.2);
        assert_eq!(config.sat_basis, PauliOp::Z);
    }

    #[test]
    fn test_load_rejects_unknown_kind() {
        let file = write_yaml("problem:\n  kind: maxcut\n  n: 4\n");
        assert!(matches!(
            RunConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_yaml("problem:\n  kind: ising\n  n: 40\n");
        assert!(matches!(
            RunConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RunConfig::from_file("/does/not/exist.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}

// ============================================================================
// Instance generation
// ============================================================================

mod instances {
    use adiabat_sim::problems::random_instance;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_dimacs_output() {
        let instance = random_instance(4, 3, 3, &mut StdRng::seed_from_u64(7)).unwrap();
        let text = instance.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("p cnf 4 3"));
        for line in lines {
            let fields: Vec<i32> = line.split_whitespace().map(|f| f.parse().unwrap()).collect();
            assert_eq!(fields.len(), 4);
            assert_eq!(*fields.last().unwrap(), 0);
        }
    }

    #[test]
    fn test_json_output() {
        let instance = random_instance(3, 2, 2, &mut StdRng::seed_from_u64(1)).unwrap();
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["num_variables"], 3);
        assert_eq!(json["clauses"].as_array().unwrap().len(), 2);
        assert_eq!(json["clauses"][0].as_array().unwrap().len(), 2);
    }
}

// ============================================================================
// Reports
// ============================================================================

mod reports {
    use adiabat_sim::config::{ProblemConfig, RunConfig};
    use adiabat_sim::run::{RunReport, run};

    #[test]
    fn test_report_json_roundtrip() {
        let mut config = RunConfig::default();
        config.problem = ProblemConfig::Ising {
            n: 2,
            coupling: 1.0,
            field: 0.0,
        };
        config.schedule.rate = 1.0;
        let report = run(&config).unwrap();

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.config, report.config);
        assert_eq!(back.trace.len(), report.trace.len());
        assert!(back.instance.is_none());
    }
}
