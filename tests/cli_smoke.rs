use std::path::PathBuf;

fn bin() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_scrollstage")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "scrollstage.exe"
            } else {
                "scrollstage"
            });
            p
        })
}

#[test]
fn cli_validates_the_fixture() {
    let out = std::process::Command::new(bin())
        .args(["validate", "--in", "tests/data/page.json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("page ok"));
    assert!(stdout.contains("hero-window"));
}

#[test]
fn cli_sweep_prints_the_final_page() {
    let out = std::process::Command::new(bin())
        .args([
            "sweep",
            "--in",
            "tests/data/page.json",
            "--and-back",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let page: scrollstage::Page =
        serde_json::from_slice(&out.stdout).unwrap();
    assert!(page.nodes().count() > 0);
}
