#[allow(clippy::module_inception)]
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::tempdir;

    use super::super::{read_hash_log, HashLog, HashRecord};
    use crate::error::Error;
    use crate::processing::types::PHash;

    #[test]
    fn test_record_line_format() {
        let record = HashRecord::new(PHash(18446744073709551615), "photos/cat.jpg");
        assert_eq!(record.to_bytes(), b"18446744073709551615,photos/cat.jpg\n");

        let record = HashRecord::new(PHash(0), "a b/c.png");
        assert_eq!(record.to_bytes(), b"0,a b/c.png\n");
    }

    #[test]
    fn test_parse_line() {
        let record = HashRecord::parse_line(b"12345,dir/with,comma.png\n", 1).unwrap();
        assert_eq!(record.hash, PHash(12345));
        assert_eq!(record.path, PathBuf::from("dir/with,comma.png"));
    }

    #[test]
    fn test_parse_malformed_lines() {
        for line in ["no separator", "-1,neg.png", "abc,x.png", "42,"] {
            let result = HashRecord::parse_line(line.as_bytes(), 3);
            assert!(
                matches!(result, Err(Error::MalformedRecord { line: 3, .. })),
                "{}",
                line
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_written_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("dct_hashes.txt");
        let path = PathBuf::from(OsStr::from_bytes(b"photos/caf\xe9.png"));

        let mut log = HashLog::open(&log_path).unwrap();
        log.append(&HashRecord::new(PHash(7), &path)).unwrap();
        log.finish().unwrap();

        let contents = std::fs::read(&log_path).unwrap();
        assert_eq!(contents, b"7,photos/caf\xe9.png\n");

        let records = read_hash_log(&log_path).unwrap();
        assert_eq!(records, vec![HashRecord::new(PHash(7), path)]);
    }

    #[test]
    fn test_log_appends_across_handles() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("dct_hashes.txt");

        let mut log = HashLog::open(&log_path).unwrap();
        log.append(&HashRecord::new(PHash(1), "one.png")).unwrap();
        log.append(&HashRecord::new(PHash(2), "two.png")).unwrap();
        assert_eq!(log.finish().unwrap(), 2);

        let mut log = HashLog::open(&log_path).unwrap();
        log.append(&HashRecord::new(PHash(3), "three.png")).unwrap();
        assert_eq!(log.written(), 1);
        log.finish().unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(contents, "1,one.png\n2,two.png\n3,three.png\n");

        let records = read_hash_log(&log_path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], HashRecord::new(PHash(3), "three.png"));
    }

    #[test]
    fn test_drop_flushes() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("dct_hashes.txt");

        {
            let mut log = HashLog::open(&log_path).unwrap();
            log.append(&HashRecord::new(PHash(9), "nine.png")).unwrap();
        }

        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "9,nine.png\n");
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("missing").join("dct_hashes.txt");

        assert!(matches!(
            HashLog::open(&log_path),
            Err(Error::HashLog { .. })
        ));
    }

    #[test]
    fn test_read_reports_line_number() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("dct_hashes.txt");
        std::fs::write(&log_path, "1,a.png\nbroken\n").unwrap();

        assert!(matches!(
            read_hash_log(&log_path),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
    }
}
