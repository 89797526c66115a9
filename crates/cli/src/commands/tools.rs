//! `parley tools` — list the learning tools the tutor can call.

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = parley_tools::default_registry();

    println!("📚 Learning tools ({})", registry.len());
    println!("====================\n");

    for def in registry.definitions() {
        println!("  {}", def.name);
        println!("    {}", def.description);
        let required: Vec<&str> = def.parameters["required"]
            .as_array()
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        if !required.is_empty() {
            println!("    required: {}", required.join(", "));
        }
        println!();
    }

    Ok(())
}
