//! End-to-end scenarios for the coupled model.

use approx::assert_relative_eq;
use is_close::is_close;
use jscm::model::{ModelBuilder, ModelOutput};
use jscm::output::{write_concentrations, write_sea_level, write_temperature, write_to_path};
use jscm_core::config::{ConfigFile, RunConfig};
use jscm_core::emissions::{EmissionRecord, Emissions, Species};
use jscm_core::errors::JSCMError;
use jscm_core::timeseries::FloatValue;

fn config(start_year: i32, end_year: i32, sim_years: usize) -> RunConfig {
    RunConfig {
        start_year,
        end_year,
        sim_years,
        ocean_mixed_layer_depth: 75.0,
    }
}

fn run(config: RunConfig, emissions: Emissions) -> ModelOutput {
    ModelBuilder::new()
        .with_config(config)
        .with_emissions(emissions)
        .build()
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn zero_emissions_stay_at_pre_industrial() {
    let output = run(config(1750, 1752, 3), Emissions::zeros(1750, 1752));

    for series in [
        &output.concentrations.co2,
        &output.concentrations.ch4,
        &output.concentrations.n2o,
        &output.forcing,
        &output.temperature,
        &output.sea_level,
    ] {
        assert_eq!(series.start_year(), 1750);
        assert_eq!(series.to_pairs(), vec![(1750, 0.0), (1751, 0.0), (1752, 0.0)]);
    }
}

#[test]
fn co2_pulse_propagates_through_the_chain() {
    let mut records = vec![EmissionRecord::default(); 50];
    records[0] = EmissionRecord::new(2.123, 0.0, 0.0, 0.0);
    let output = run(
        config(2000, 2049, 50),
        Emissions::new(2000, records).unwrap(),
    );

    let co2 = &output.concentrations.co2;
    assert_eq!(co2.at(0), Some(0.0));
    assert!(is_close!(co2.at(1).unwrap(), 1.0));
    assert_relative_eq!(co2.at(2).unwrap(), 0.8667073648478597, epsilon = 1e-10);
    assert_relative_eq!(co2.at(49).unwrap(), 0.3375160622016369, epsilon = 1e-10);

    // Only CO2 is perturbed
    assert_eq!(output.concentrations.ch4.values().sum(), 0.0);
    assert_eq!(output.concentrations.n2o.values().sum(), 0.0);
    assert_eq!(output.forcing_breakdown.sox.sum(), 0.0);

    assert_eq!(output.forcing.at(0), Some(0.0));
    assert_eq!(output.temperature.at(0), Some(0.0));
    assert!(output.forcing.at(1).unwrap() > 0.0);
    assert!(output.temperature.at(49).unwrap() > 0.0);
    assert!(output.sea_level.at(49).unwrap() > 0.0);
}

#[test]
fn sulphate_cools() {
    let emissions = Emissions::new(
        1900,
        vec![EmissionRecord::new(0.0, 0.0, 0.0, 50.0); 30],
    )
    .unwrap();
    let output = run(config(1900, 1929, 30), emissions);

    for (year, forcing) in output.forcing.iter_pairs() {
        assert!(forcing < 0.0, "forcing in {} was {}", year, forcing);
    }
    assert!(output.temperature.at_year(1929).unwrap() < 0.0);
    assert!(output.sea_level.at_year(1929).unwrap() < 0.0);
}

#[test]
fn longer_response_horizon_does_not_change_results() {
    let emissions = Emissions::new(
        1950,
        (0..40)
            .map(|i| EmissionRecord::new(i as FloatValue * 0.25, 300.0, 8.0, 60.0))
            .collect(),
    )
    .unwrap();

    let exact = run(config(1950, 1989, 40), emissions.clone());
    let padded = run(config(1950, 1989, 120), emissions);

    assert_eq!(exact, padded);
}

#[test]
fn short_response_horizon_is_rejected() {
    let result = ModelBuilder::new()
        .with_config(config(1750, 1760, 5))
        .with_emissions(Emissions::zeros(1750, 1760))
        .build();
    assert!(matches!(result, Err(JSCMError::Config(_))));
}

#[test]
fn unphysical_emissions_fail_with_domain_error() {
    // Strong removal drives the CO2 anomaly below -C0
    let emissions = Emissions::new(
        2000,
        vec![EmissionRecord::new(-2000.0, 0.0, 0.0, 0.0); 10],
    )
    .unwrap();
    let result = ModelBuilder::new()
        .with_config(config(2000, 2009, 10))
        .with_emissions(emissions)
        .build()
        .unwrap()
        .run();
    assert!(matches!(result, Err(JSCMError::Domain { .. })));
}

#[test]
fn run_from_configuration_files() {
    let dir = std::env::temp_dir().join(format!("jscm-scenario-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    std::fs::write(
        dir.join("emissions.txt"),
        "Emissions for a test scenario\n\
         CO2 [PgC/yr] CH4 [Tg/yr] N2O [Tg/yr] SOx [TgS/yr]\n\
         year CO2 CH4 N2O SOx\n\
         1800 1.0 100.0 2.0 5.0\n\
         1810 2.0 200.0 4.0 10.0\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("run.toml"),
        r#"
start_year = 1800
end_year = 1819
sim_years = 20
ocean_mixed_layer_depth = 75.0
emissions_file = "emissions.txt"
temperature_file = "out/temperature.txt"
sea_level_file = "out/sea_level.txt"
co2_concentrations_file = "out/co2.txt"
"#,
    )
    .unwrap();

    let config = ConfigFile::from_path(dir.join("run.toml")).unwrap();
    let emissions = Emissions::from_path(
        &config.emissions_file,
        config.run.start_year,
        config.run.end_year,
    )
    .unwrap();
    // Held constant after the last row
    assert_eq!(emissions.records()[19].get(Species::Co2), 2.0);
    assert_relative_eq!(emissions.records()[5].get(Species::Ch4), 150.0, epsilon = 1e-12);

    let output = run(config.run.clone(), emissions);
    write_to_path(&config.temperature_file, |w| write_temperature(w, &output)).unwrap();
    write_to_path(&config.sea_level_file, |w| write_sea_level(w, &output)).unwrap();
    write_to_path(config.co2_concentrations_file.as_ref().unwrap(), |w| {
        write_concentrations(w, Species::Co2, &output)
    })
    .unwrap();

    let temperature = std::fs::read_to_string(dir.join("out/temperature.txt")).unwrap();
    let lines: Vec<&str> = temperature.lines().collect();
    assert_eq!(lines.len(), 21);
    assert!(lines[0].contains("change in temperature"));
    assert!(lines[1].starts_with("1800    "));
    assert!(lines[20].starts_with("1819    "));

    let co2 = std::fs::read_to_string(dir.join("out/co2.txt")).unwrap();
    assert_eq!(co2.lines().nth(1), Some("1800    278.305"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn sox_has_no_concentration_file() {
    let output = run(config(1750, 1752, 3), Emissions::zeros(1750, 1752));
    let mut buffer = Vec::new();
    assert!(matches!(
        write_concentrations(&mut buffer, Species::Sox, &output),
        Err(JSCMError::Config(_))
    ));
}
