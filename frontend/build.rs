fn main() {
    // Bake the API location into the bundle if set at build time
    println!("cargo:rerun-if-env-changed=VAULT_API_URL");
    if let Ok(url) = std::env::var("VAULT_API_URL") {
        println!("cargo:rustc-env=VAULT_API_URL={}", url);
    }
}
