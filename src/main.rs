use std::io::Write;

use stepflow::demo::{run_profile_demo, Account};
use stepflow::{AppError, EngineConfig};

fn main() -> Result<(), AppError> {
    let config = EngineConfig::from_env()?;
    env_logger::Builder::new().format(|buf, record| {
                                  writeln!(buf,
                                           "{} - {} - {}",
                                           chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                                           record.level(),
                                           record.args())
                              })
                              .filter(None, config.log_level)
                              .init();

    println!("Flujo de perfil (schemaVersion <= {})", config.schema_version);

    let first_visit = Account { email: "ana@example.com".to_string(),
                                onboarded: false,
                                token: None };
    let report = run_profile_demo(&config, first_visit, "ana@new.example.com")?;
    for line in &report.transcript {
        println!("  {line}");
    }
    println!("Sesión final: {:?} (eventos: {})", report.final_session, report.events);

    let returning = Account { email: "bob@example.com".to_string(),
                              onboarded: true,
                              token: Some("stored-token".to_string()) };
    let report = run_profile_demo(&config, returning, "bob@new.example.com")?;
    let json = serde_json::to_string_pretty(&report)?;
    println!("Cuenta recurrente:\n{json}");
    Ok(())
}
