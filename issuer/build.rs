use std::process::Command;

fn main() {
    let version = std::env::var("CARGO_PKG_VERSION")
        .ok()
        .filter(|v| v.ends_with("-git"));
    let hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_owned());
    if let (Some(version), Some(hash)) = (version, hash) {
        println!("cargo:rustc-env=CARGO_PKG_VERSION={}-{}", version, hash);
    }
}
