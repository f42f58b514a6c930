use std::process::Command;

fn main() {
    // CADEIA_DOMINIAL_VERSION from CI wins, then the git tag, then "dev".
    let version = std::env::var("CADEIA_DOMINIAL_VERSION")
        .ok()
        .filter(|s| !s.is_empty() && s != "dev")
        .or_else(|| {
            Command::new("git")
                .args(["describe", "--tags", "--always"])
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "dev".to_string());

    println!("cargo:rustc-env=CADEIA_DOMINIAL_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=CADEIA_DOMINIAL_VERSION");
}
