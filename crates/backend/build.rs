use std::env;
use std::fs;
use std::path::Path;

// Copies the workspace-root config.toml next to the compiled binary so the
// runtime lookup (exe dir first, embedded default second) finds it during
// development as well as in deployment.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();

    // OUT_DIR looks like target/<profile>/build/backend-xxx/out; walk up to
    // the profile directory where the binary lands.
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        return;
    };

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root not found");

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        let dest_config = target_dir.join("config.toml");
        fs::copy(&source_config, &dest_config)
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    }
}
