//! Track the status line and `Content-Length` of the final response while headers stream in.

use super::error::FetchError;

/// Head of the most recent response seen on a transfer (redirect hops reset it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub status: Option<u32>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Feed one raw header line as delivered by libcurl.
    pub fn observe(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Some(200)
    }

    /// The body is complete if it matches the advertised `Content-Length` (when there is one).
    pub fn check_length(&self, received: u64) -> Result<(), FetchError> {
        match self.content_length {
            Some(expected) if expected != received => {
                Err(FetchError::PartialTransfer { expected, received })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(lines: &[&str]) -> ResponseHead {
        let mut h = ResponseHead::default();
        for l in lines {
            h.observe(l);
        }
        h
    }

    #[test]
    fn status_and_length() {
        let h = head(&["HTTP/1.1 200 OK\r\n", "Content-Length: 12345\r\n", "\r\n"]);
        assert_eq!(h.status, Some(200));
        assert_eq!(h.content_length, Some(12345));
        assert!(h.is_ok());
    }

    #[test]
    fn redirect_hop_resets_length() {
        let h = head(&[
            "HTTP/1.1 302 Found",
            "Content-Length: 17",
            "Location: https://mirror.example/a.bw",
            "",
            "HTTP/2 200",
            "content-type: application/octet-stream",
        ]);
        assert_eq!(h.status, Some(200));
        assert_eq!(h.content_length, None);
    }

    #[test]
    fn not_found() {
        let h = head(&["HTTP/1.1 404 Not Found", "Content-Length: 9"]);
        assert_eq!(h.status, Some(404));
        assert!(!h.is_ok());
    }

    #[test]
    fn short_body_is_partial_transfer() {
        let h = head(&["HTTP/1.1 200 OK", "Content-Length: 100"]);
        match h.check_length(40) {
            Err(FetchError::PartialTransfer { expected, received }) => {
                assert_eq!((expected, received), (100, 40));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            h.check_length(101),
            Err(FetchError::PartialTransfer { expected: 100, received: 101 })
        ));
    }

    #[test]
    fn length_check_passes_on_match_or_without_header() {
        let h = head(&["HTTP/1.1 200 OK", "Content-Length: 100"]);
        assert!(h.check_length(100).is_ok());
        let chunked = head(&["HTTP/1.1 200 OK", "Transfer-Encoding: chunked"]);
        assert!(chunked.check_length(7).is_ok());
    }
}
