//! Streamed single GET of one track into a `.part` file.

use super::error::FetchError;
use super::headers::ResponseHead;
use super::FetchOptions;
use crate::storage::PartFile;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::str;

/// Downloads `url` to `dest`, writing through a `chunk_size` buffer into `<dest>.part`
/// and renaming on success. Returns the number of bytes written.
///
/// Any non-200 final status, transport error or short body is an error, and the
/// `.part` file is removed so the next run retries the track.
pub fn download_track(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let mut part = PartFile::create(dest, opts.chunk_size).map_err(FetchError::storage)?;
    match transfer(url, &mut part, opts) {
        Ok(()) => {
            let written = part.written();
            part.commit().map_err(FetchError::storage)?;
            Ok(written)
        }
        Err(e) => {
            part.discard();
            Err(e)
        }
    }
}

fn transfer(url: &str, part: &mut PartFile, opts: &FetchOptions) -> Result<(), FetchError> {
    let head = RefCell::new(ResponseHead::default());
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.buffer_size(opts.chunk_size)?;
    easy.connect_timeout(opts.connect_timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                head.borrow_mut().observe(s);
            }
            true
        })?;
        transfer.write_function(|data| {
            // Error bodies (404 pages etc.) are swallowed, not written.
            if !head.borrow().is_ok() {
                return Ok(data.len());
            }
            match part.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(FetchError::storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if code != 200 {
        return Err(FetchError::Http(code));
    }

    part.flush().map_err(FetchError::storage)?;
    let received = part.written();
    head.into_inner().check_length(received)
}
