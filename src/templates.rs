//! Minijinja template engine configuration with embedded templates.

use minijinja::Environment;

/// Build the template environment
///
/// Templates are compiled into the binary. The `.html` names enable
/// auto-escaping, which keeps round-tripped authorize parameters from
/// breaking out of their hidden form fields.
pub fn build_env(version: String) -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_global("version", version);
    env.add_template("login.html", include_str!("../templates/login.html"))?;
    env.add_template("logout.html", include_str!("../templates/logout.html"))?;
    Ok(env)
}
