use std::fs;

pub fn get() -> String {
    let config_path = match std::env::var("PP_CONFIG_PATH") {
        Ok(path) => path,
        Err(_) => "config.yml".to_owned(),
    };

    if fs::metadata(&config_path).is_err() {
        pp_log::panic(
            None,
            format!("[Participation] Config file '{config_path}' does not exist, set PP_CONFIG_PATH or add config.yml to the current directory"),
        );
    }

    config_path
}
