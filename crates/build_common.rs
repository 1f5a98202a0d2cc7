// README-to-rustdoc step shared by every crate's build.rs.
//
// Pull it in with `include!("../build_common.rs");` after importing
// `std::env`, `std::fs` and `std::path::Path`.

/// Rewrite source-file links in a README into rustdoc module links.
///
/// `](src/paths/mod.rs)` becomes `](paths/index.html)` and
/// `](src/config.rs)` becomes `](config/index.html)`. Other links are
/// left alone.
fn rustdoc_links(readme: &str) -> String {
    let mut out = String::with_capacity(readme.len());
    let mut rest = readme;

    while let Some(start) = rest.find("](src/") {
        out.push_str(&rest[..start + 2]);
        let target = &rest[start + 6..];
        let Some(end) = target.find(')') else {
            out.push_str("src/");
            rest = target;
            continue;
        };

        let path = &target[..end];
        let module = path
            .strip_suffix("/mod.rs")
            .or_else(|| path.strip_suffix(".rs"));
        match module {
            Some(module) => {
                out.push_str(module);
                out.push_str("/index.html");
            }
            None => {
                out.push_str("src/");
                out.push_str(path);
            }
        }
        rest = &target[end..];
    }
    out.push_str(rest);
    out
}

/// Write `README_GENERATED.md` into `OUT_DIR` for the crate-level docs.
///
/// A crate without a README gets an empty file, so the crate root's
/// `include_str!` always resolves.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");

    let readme = fs::read_to_string(Path::new(crate_dir).join("README.md")).unwrap_or_default();
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    fs::write(
        Path::new(&out_dir).join("README_GENERATED.md"),
        rustdoc_links(&readme),
    )
    .expect("OUT_DIR is writable");
}
