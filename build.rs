// RustIrReceiver - Build Script
//
// Wires up the ESP-IDF environment when cross-compiling for espidf.
// Host builds (unit/integration tests of the decoding core) skip it.

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
