use dupfind::duplicates::DuplicateFinder;
use dupfind::error::ExitCode;
use dupfind::output::{CsvOutput, JsonOutput};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        let quote_name = "file_with_\"quote\".txt";
        File::create(dir.path().join(quote_name))
            .expect("Failed to create file with quotes")
            .write_all(b"content")
            .unwrap();
        File::create(dir.path().join("duplicate.txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();

        let finder = DuplicateFinder::with_defaults();
        let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result.groups()[0]
            .files
            .iter()
            .any(|f| f.to_string_lossy().contains('"')));

        // The quote must survive a JSON round trip
        let json = JsonOutput::new(&result, &summary, ExitCode::Success)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let files = value["duplicates"][0]["files"].as_array().unwrap();
        assert!(files
            .iter()
            .any(|f| f.as_str().unwrap().ends_with(quote_name)));
    }
}

#[test]
fn test_paths_with_spaces_and_commas_in_csv() {
    let dir = tempdir().unwrap();
    let odd = dir.path().join("a file, with commas.txt");
    File::create(&odd).unwrap().write_all(b"csv").unwrap();
    File::create(dir.path().join("plain.txt"))
        .unwrap()
        .write_all(b"csv")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();
    let csv_text = CsvOutput::new(&result).to_string().unwrap();

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let paths: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[2].to_string())
        .collect();

    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0], odd.to_string_lossy());
}

#[test]
fn test_paths_with_newlines() {
    let dir = tempdir().unwrap();

    // Windows does not allow newlines in filenames.
    if cfg!(not(windows)) {
        File::create(dir.path().join("file_with\nnewline.txt"))
            .expect("Failed to create file with newline")
            .write_all(b"content")
            .unwrap();
        File::create(dir.path().join("duplicate.txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();

        let finder = DuplicateFinder::with_defaults();
        let (result, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(result.len(), 1);
        assert!(result.groups()[0]
            .files
            .iter()
            .any(|f| f.to_string_lossy().contains('\n')));
    }
}

#[test]
fn test_unicode_file_names() {
    let dir = tempdir().unwrap();
    let names = ["café.txt", "日本語.txt", "emoji_🦀.txt"];
    for name in names {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(b"unicode")
            .unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].len(), names.len());
    for name in names {
        assert!(result.groups()[0].contains(&dir.path().join(name)));
    }
}

#[test]
fn test_extremely_long_paths() {
    let dir = tempdir().unwrap();

    let mut current_path = dir.path().to_path_buf();
    let folder_name = "a".repeat(50);

    for i in 0..6 {
        current_path = current_path.join(format!("{}_{}", i, folder_name));
        if let Err(e) = fs::create_dir(&current_path) {
            eprintln!(
                "Skipping extremely long path test: failed to create dir: {}",
                e
            );
            return;
        }
    }

    let file_path = current_path.join("file.txt");
    if let Err(e) = File::create(&file_path).and_then(|mut f| f.write_all(b"content")) {
        eprintln!(
            "Skipping extremely long path test: failed to create file: {}",
            e
        );
        return;
    }

    File::create(dir.path().join("duplicate.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.groups()[0].contains(&file_path));
}
