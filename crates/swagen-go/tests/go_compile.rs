use std::fs;
use std::process::Command;

use swagen_core::config::GeneratorConfig;
use swagen_core::{CodeGenerator, parse, transform};
use swagen_go::GoGenerator;

const PETSTORE: &str = include_str!("../../swagen-core/tests/fixtures/petstore-2.0.yaml");

#[test]
#[ignore] // Requires a Go 1.22+ toolchain
fn generated_go_builds() {
    let ir = transform::transform(parse::from_yaml(PETSTORE).unwrap()).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("go.mod"), "module example.com/petstore\n\ngo 1.22\n").unwrap();

    let output_dir = dir.join("api");
    let files = GoGenerator
        .generate(&ir, &GeneratorConfig::new(&output_dir))
        .unwrap();

    for file in &files {
        let path = output_dir.join(&file.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &file.content).unwrap();
    }

    let output = Command::new("go")
        .args(["vet", "./..."])
        .current_dir(dir)
        .output()
        .expect("failed to run go");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!("Go build failed:\nstdout: {}\nstderr: {}", stdout, stderr);
    }
}
