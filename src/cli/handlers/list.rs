use crate::cli::Cli;
use hunspell_embed::Manifest;

pub fn handle(cli: &Cli, manifest: &Manifest) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = manifest.jobs(&cli.locales)?;
    let layout = manifest.settings.layout()?;
    for job in &jobs {
        layout.validate_for(&job.locale)?;
    }
    let output_dir = manifest.settings.output_dir();

    if cli.json {
        let entries: Vec<serde_json::Value> = jobs
            .iter()
            .map(|job| {
                let name = manifest
                    .get_locale(job.locale.as_str())
                    .and_then(|entry| entry.name.clone());
                serde_json::json!({
                    "locale": job.locale.as_str(),
                    "name": name,
                    "aff": job.aff,
                    "dic": job.dic,
                    "aff_exists": job.aff.exists(),
                    "dic_exists": job.dic.exists(),
                    "identifier": job.locale.identifier(&layout.identifier_prefix),
                    "output": output_dir.join(job.locale.file_name(&layout.file_prefix, &layout.extension)),
                })
            })
            .collect();
        let output = serde_json::json!({
            "export": layout.export.as_str(),
            "locales": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Configured locales:\n");
    for job in &jobs {
        let name = manifest
            .get_locale(job.locale.as_str())
            .and_then(|entry| entry.name.as_deref())
            .unwrap_or("-");
        let status = match (job.aff.exists(), job.dic.exists()) {
            (true, true) => "ready",
            (false, false) => "missing .aff and .dic",
            (false, true) => "missing .aff",
            (true, false) => "missing .dic",
        };
        let output = output_dir.join(job.locale.file_name(&layout.file_prefix, &layout.extension));
        println!(
            "  {:<10} {:<12} {} -> {} ({})",
            job.locale.as_str(),
            name,
            job.locale.identifier(&layout.identifier_prefix),
            output.display(),
            status
        );
    }

    Ok(())
}
