use log::info;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the RNTO (Rename To) FTP command.
///
/// Requires a pending RNFR; the destination must not exist and its parent
/// directory must be a directory. The pending source is cleared on every
/// outcome.
pub async fn handle_rnto_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if session.rename_from.is_empty() {
        return Reply::send_line(ctrl, "503 Need RNFR before RNTO").await;
    }
    let from = std::mem::take(&mut session.rename_from);

    if arg.is_empty() {
        return Reply::send_line(ctrl, "501 No file name").await;
    }
    let to = match make_path_from(&session.cwd, arg) {
        Ok(p) => p,
        Err(_) => return Reply::send_line(ctrl, "500 Command line too long").await,
    };

    if session.storage.exists(&to).await {
        let mut reply = Reply::begin("553 ");
        reply.append(arg).append(" already exists");
        return reply.send(ctrl).await;
    }

    let parent = parent_dir(&to);
    if !session.storage.is_dir(parent).await {
        let mut reply = Reply::begin("550 \"");
        reply.append(parent).append("\" is not directory");
        return reply.send(ctrl).await;
    }

    match session.storage.rename(&from, &to).await {
        Ok(()) => {
            info!("slot {}: renamed {} to {}", session.num, from, to);
            Reply::send_line(ctrl, "250 File successfully renamed or moved").await
        }
        Err(_) => Reply::send_line(ctrl, "451 Rename/move failure").await,
    }
}

/// Directory part of an absolute virtual path, `/` for top-level names.
fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

#[cfg(test)]
mod tests {
    use super::parent_dir;

    #[test]
    fn parent_of_nested_path() {
        assert_eq!(parent_dir("/a/b/c.txt"), "/a/b");
    }

    #[test]
    fn parent_of_top_level_name_is_root() {
        assert_eq!(parent_dir("/c.txt"), "/");
    }
}
