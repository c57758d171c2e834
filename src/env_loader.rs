use std::path::PathBuf;

fn fallback_dotenv_path(home_dir: Option<PathBuf>) -> Option<PathBuf> {
    Some(home_dir?.join(".collsync/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let Some(path) = fallback_dotenv_path(dirs::home_dir()) else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_lives_under_the_home_config_dir() {
        let got = fallback_dotenv_path(Some(PathBuf::from("/home/alice")));
        let want = Some(PathBuf::from("/home/alice/.collsync/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn no_fallback_without_a_home_dir() {
        assert_eq!(fallback_dotenv_path(None), None);
    }
}
