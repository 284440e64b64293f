use minijinja::{Environment, context};

/// Emit `mod.rs` declaring every generated module.
pub fn emit_index(modules: &[String]) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("mod.rs.j2", include_str!("../../templates/mod.rs.j2"))?;
    let tmpl = env.get_template("mod.rs.j2")?;
    tmpl.render(context! { modules => modules })
}
