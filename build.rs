use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("`OUT_DIR` is not set")?);

    generate("src/ast/nodes.json", &out_dir.join("ast"))?;
    generate("tests/schemas/calc.json", &out_dir.join("calc"))?;

    Ok(())
}

/// Output is left unformatted, it is only ever `include!`d.
fn generate(schema: &str, out_dir: &Path) -> astgen::Result<()> {
    println!("cargo::rerun-if-changed={schema}");

    let schema = astgen::Schema::load(schema)?;
    let units = astgen::generate(&schema)?;
    astgen::output::write_units(out_dir, &units, None)?;

    Ok(())
}
