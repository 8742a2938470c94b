//! Filesystem collaborator.
//!
//! Every client-visible path is an absolute virtual path (`/...`) that is
//! mapped under the configured chroot directory before touching the real
//! filesystem. Concurrent access from different sessions to different
//! paths is fine; two sessions operating on the same path concurrently is
//! unspecified (no lock is taken) and is a documented limitation.

pub mod datetime;

use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use sysinfo::{DiskExt, System, SystemExt};
use tokio::fs::{self, File};

/// A directory entry as the listing commands need it.
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    /// Packed FAT date, 0 when the modification time is unknown.
    pub fdate: u16,
    pub ftime: u16,
}

#[derive(Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(chroot_dir: &str) -> Self {
        Self {
            root: PathBuf::from(chroot_dir),
        }
    }

    /// Map a virtual absolute path onto the real filesystem.
    fn resolve(&self, vpath: &str) -> PathBuf {
        self.root.join(vpath.trim_start_matches('/'))
    }

    pub async fn exists(&self, vpath: &str) -> bool {
        if vpath == "/" {
            return true;
        }
        fs::metadata(self.resolve(vpath)).await.is_ok()
    }

    pub async fn is_dir(&self, vpath: &str) -> bool {
        if vpath == "/" {
            return true;
        }
        match fs::metadata(self.resolve(vpath)).await {
            Ok(m) => m.is_dir(),
            Err(_) => false,
        }
    }

    pub async fn size(&self, vpath: &str) -> io::Result<u64> {
        Ok(fs::metadata(self.resolve(vpath)).await?.len())
    }

    /// Packed modification date/time of a file.
    pub async fn modify_time(&self, vpath: &str) -> io::Result<(u16, u16)> {
        let modified = fs::metadata(self.resolve(vpath)).await?.modified()?;
        Ok(datetime::pack_system_time(modified))
    }

    pub async fn set_modify_time(&self, vpath: &str, date: u16, time: u16) -> io::Result<()> {
        let ft = datetime::unpack_to_file_time(date, time)?;
        let path = self.resolve(vpath);
        tokio::task::spawn_blocking(move || filetime::set_file_mtime(&path, ft))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    pub async fn open_read(&self, vpath: &str) -> io::Result<File> {
        File::open(self.resolve(vpath)).await
    }

    pub async fn create(&self, vpath: &str) -> io::Result<File> {
        File::create(self.resolve(vpath)).await
    }

    pub async fn remove_file(&self, vpath: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(vpath)).await
    }

    pub async fn create_dir(&self, vpath: &str) -> io::Result<()> {
        fs::create_dir(self.resolve(vpath)).await
    }

    pub async fn remove_dir(&self, vpath: &str) -> io::Result<()> {
        fs::remove_dir(self.resolve(vpath)).await
    }

    pub async fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.resolve(from), self.resolve(to)).await
    }

    pub async fn read_dir(&self, vpath: &str) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(self.resolve(vpath)).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let (is_dir, size, fdate, ftime) = match entry.metadata().await {
                Ok(m) => {
                    let (d, t) = m
                        .modified()
                        .map(datetime::pack_system_time)
                        .unwrap_or((0, 0));
                    (m.is_dir(), m.len(), d, t)
                }
                Err(e) => {
                    debug!("metadata failed for {:?}: {}", entry.path(), e);
                    (false, 0, 0, 0)
                }
            };
            entries.push(DirEntryInfo {
                name,
                is_dir,
                size,
                fdate,
                ftime,
            });
        }
        Ok(entries)
    }

    /// Free and total capacity of the disk holding the chroot, in MB.
    ///
    /// Scans the mounted disks the same way the SITE FREE reply reports
    /// them; an unmatched path reports zero rather than failing.
    pub fn free_space(&self) -> (u64, u64) {
        let sys = System::new_all();
        let path: &Path = &self.root;
        for disk in sys.disks() {
            if path.starts_with(disk.mount_point()) {
                return (
                    disk.available_space() / 1_048_576,
                    disk.total_space() / 1_048_576,
                );
            }
        }
        (0, 0)
    }
}
