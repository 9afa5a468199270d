// Build script for satr_dsp.
//
// The ADR digital framer drives the system's libtwolame (MPEG-1 Layer II)
// encoder directly through a small extern "C" binding in src/adr/mp2.rs,
// the same handful of calls the original ADR encoder makes. pkg-config
// locates and links it; there is no vendored copy of the library here.

fn main() {
    println!("cargo:rerun-if-changed=src/adr/mp2.rs");

    match pkg_config::probe_library("twolame") {
        Ok(_) => {}
        Err(err) => {
            // Fall back to a bare `-ltwolame` so builds on systems without a
            // twolame.pc file (it's not universally packaged) still link,
            // matching how the original's Makefile allows LIBTWOLAME to be
            // overridden.
            println!("cargo:warning=pkg-config could not find twolame ({err}); linking -ltwolame directly");
            println!("cargo:rustc-link-lib=twolame");
        }
    }
}
