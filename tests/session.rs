//! End-to-end tests over loopback control and data connections.

use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use petitftpd::{Config, Server};

const USER: &str = "stm32";
const PASS: &str = "chibi";

async fn spawn_server_at(chroot: &std::path::Path, max_clients: usize) -> SocketAddr {
    let mut config = Config::default();
    config.server.listen_port = 0;
    config.server.data_port_base = 0;
    config.server.max_clients = max_clients;
    config.server.chroot_dir = chroot.to_string_lossy().into_owned();
    config.server.log_dir = chroot.join("log").to_string_lossy().into_owned();

    let server = Server::bind(config).await.unwrap();
    let port = server.local_addr().unwrap().port();
    tokio::spawn(server.serve());
    format!("127.0.0.1:{}", port).parse().unwrap()
}

async fn spawn_server(max_clients: usize) -> (SocketAddr, TempDir) {
    let root = tempfile::tempdir().unwrap();
    let addr = spawn_server_at(root.path(), max_clients).await;
    (addr, root)
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
        }
    }

    /// Next reply line, CRLF stripped. Panics if the server goes quiet.
    async fn line(&mut self) -> String {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a reply")
            .unwrap();
        assert!(n > 0, "server closed the connection");
        line.trim_end().to_string()
    }

    /// Ok(None) on a cleanly closed connection.
    async fn try_line(&mut self) -> Option<String> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for close")
            .unwrap();
        if n == 0 {
            None
        } else {
            Some(line.trim_end().to_string())
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn expect_greeting(&mut self) {
        assert!(self.line().await.starts_with("220---"));
        assert!(self.line().await.starts_with("220 Version"));
    }

    async fn login(addr: SocketAddr) -> Self {
        let mut client = Self::connect(addr).await;
        client.expect_greeting().await;
        client.send(&format!("USER {}", USER)).await;
        assert!(client.line().await.starts_with("331"));
        client.send(&format!("PASS {}", PASS)).await;
        assert!(client.line().await.starts_with("230"));
        client
    }

    /// Enter passive mode and return the advertised data address.
    async fn pasv(&mut self) -> SocketAddr {
        self.send("PASV").await;
        let reply = self.line().await;
        assert!(reply.starts_with("227"), "unexpected PASV reply: {}", reply);
        let inner = &reply[reply.find('(').unwrap() + 1..reply.find(')').unwrap()];
        let fields: Vec<u16> = inner.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 6);
        format!(
            "{}.{}.{}.{}:{}",
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            fields[4] * 256 + fields[5]
        )
        .parse()
        .unwrap()
    }

    /// Consume a transfer completion summary, single- or two-line form.
    async fn expect_transfer_complete(&mut self) {
        let first = self.line().await;
        assert!(first.starts_with("226"), "unexpected reply: {}", first);
        if first.starts_with("226-") {
            assert!(self.line().await.starts_with("226 "));
        }
    }
}

#[tokio::test]
async fn greeting_login_and_quit() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.send("QUIT").await;
    assert_eq!(client.line().await, "221 Goodbye");
}

#[tokio::test]
async fn bad_user_gets_one_reply_then_close() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::connect(addr).await;
    client.expect_greeting().await;
    client.send("USER nobody").await;
    assert_eq!(client.line().await, "530 Login incorrect.");
    assert_eq!(client.try_line().await, None);
}

#[tokio::test]
async fn bad_password_gets_one_reply_then_close() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::connect(addr).await;
    client.expect_greeting().await;
    client.send(&format!("USER {}", USER)).await;
    assert!(client.line().await.starts_with("331"));
    client.send("PASS wrong").await;
    assert_eq!(client.line().await, "530 Login incorrect.");
    assert_eq!(client.try_line().await, None);
}

#[tokio::test]
async fn command_before_user_closes_session() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::connect(addr).await;
    client.expect_greeting().await;
    client.send("NOOP").await;
    assert_eq!(client.line().await, "500 Syntax error");
    assert_eq!(client.try_line().await, None);
}

#[tokio::test]
async fn unknown_command_is_rejected_and_session_continues() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.send("XYZW something").await;
    assert!(client.line().await.starts_with("500 Unknown command"));
    client.send("NOOP").await;
    assert_eq!(client.line().await, "200 Zzz...");
    client.send("SYST").await;
    assert_eq!(client.line().await, "215 UNIX Type: L8");
}

#[tokio::test]
async fn retr_without_data_mode_is_425() {
    let (addr, root) = spawn_server(2).await;
    std::fs::write(root.path().join("song.mp3"), b"data").unwrap();
    let mut client = Client::login(addr).await;
    client.send("RETR song.mp3").await;
    assert_eq!(client.line().await, "425 No data connection");
}

#[tokio::test]
async fn dot_segments_cannot_escape_the_chroot() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("secret.txt"), b"top secret").unwrap();
    let jail = root.path().join("jail");
    std::fs::create_dir(&jail).unwrap();
    let addr = spawn_server_at(&jail, 2).await;

    let mut client = Client::login(addr).await;
    client.send("RETR ../secret.txt").await;
    assert_eq!(client.line().await, "550 File ../secret.txt not found");
    client.send("SIZE ../../secret.txt").await;
    assert_eq!(client.line().await, "550 No such file");
    client.send("CWD ..").await;
    // ".." clamps at the virtual root, which always exists.
    assert_eq!(client.line().await, "250 Directory successfully changed.");
    client.send("PWD").await;
    assert_eq!(client.line().await, "257 \"/\" is your current directory");
}

#[tokio::test]
async fn aborted_list_data_connection_keeps_the_session() {
    let (addr, root) = spawn_server(2).await;
    for i in 0..3000 {
        std::fs::write(root.path().join(format!("file-{:04}", i)), b"x").unwrap();
    }
    let mut client = Client::login(addr).await;

    let data_addr = client.pasv().await;
    let data = TcpStream::connect(data_addr).await.unwrap();
    // Reset instead of a clean close, so the listing write fails mid-way.
    data.set_linger(Some(Duration::from_secs(0))).unwrap();
    client.send("LIST").await;
    assert_eq!(client.line().await, "150 Accepted data connection");
    drop(data);

    assert!(client.line().await.starts_with("226"));
    client.send("NOOP").await;
    assert_eq!(client.line().await, "200 Zzz...");
}

#[tokio::test]
async fn stor_to_a_directory_name_is_451() {
    let (addr, root) = spawn_server(2).await;
    std::fs::create_dir(root.path().join("music")).unwrap();
    let mut client = Client::login(addr).await;

    client.send("STOR music").await;
    assert_eq!(client.line().await, "451 Can't open/create music");
    client.send("NOOP").await;
    assert_eq!(client.line().await, "200 Zzz...");
}

#[tokio::test]
async fn port_with_bad_argument_is_501() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.send("PORT 1,2,3").await;
    assert_eq!(client.line().await, "501 Can't interpret parameters");
}

#[tokio::test]
async fn port_after_pasv_switches_mode() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.pasv().await;
    client.send("PORT 127,0,0,1,200,10").await;
    assert_eq!(client.line().await, "200 PORT command successful");
}

#[tokio::test]
async fn rnto_without_rnfr_is_503() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.send("RNTO new.txt").await;
    assert_eq!(client.line().await, "503 Need RNFR before RNTO");
}

#[tokio::test]
async fn stor_then_retr_roundtrip_over_passive() {
    let (addr, root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    let payload = b"four hundred bytes of nothing much".repeat(12);

    let data_addr = client.pasv().await;
    let mut data = TcpStream::connect(data_addr).await.unwrap();
    client.send("STOR upload.bin").await;
    assert!(client.line().await.starts_with("150 Connected to port"));
    data.write_all(&payload).await.unwrap();
    drop(data);
    client.expect_transfer_complete().await;
    assert_eq!(std::fs::read(root.path().join("upload.bin")).unwrap(), payload);

    let data_addr = client.pasv().await;
    let mut data = TcpStream::connect(data_addr).await.unwrap();
    client.send("RETR upload.bin").await;
    assert!(client.line().await.starts_with("150-Connected to port"));
    assert_eq!(
        client.line().await,
        format!("150 {} bytes to download", payload.len())
    );
    let mut received = Vec::new();
    data.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, payload);
    client.expect_transfer_complete().await;
}

#[tokio::test]
async fn list_over_passive_shows_entries() {
    let (addr, root) = spawn_server(2).await;
    std::fs::write(root.path().join("a.txt"), b"12345").unwrap();
    std::fs::create_dir(root.path().join("music")).unwrap();
    std::fs::write(root.path().join(".hidden"), b"x").unwrap();
    let mut client = Client::login(addr).await;

    let data_addr = client.pasv().await;
    let mut data = TcpStream::connect(data_addr).await.unwrap();
    client.send("LIST").await;
    assert_eq!(client.line().await, "150 Accepted data connection");
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert_eq!(client.line().await, "226 Directory send OK.");

    assert!(listing.contains("+r,s5,\ta.txt"));
    assert!(listing.contains("+/,\tmusic"));
    assert!(!listing.contains(".hidden"));
}

#[tokio::test]
async fn mlsd_reports_match_count() {
    let (addr, root) = spawn_server(2).await;
    std::fs::write(root.path().join("a.txt"), b"12345").unwrap();
    std::fs::create_dir(root.path().join("music")).unwrap();
    let mut client = Client::login(addr).await;

    let data_addr = client.pasv().await;
    let mut data = TcpStream::connect(data_addr).await.unwrap();
    client.send("MLSD").await;
    assert_eq!(client.line().await, "150 Accepted data connection");
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert_eq!(client.line().await, "226-options: -a -l");
    assert_eq!(client.line().await, "226 2 matches total");

    assert!(listing.contains("Type=file;Size=5;"));
    assert!(listing.contains("Type=dir;"));
    assert!(listing.contains(" a.txt"));
}

#[tokio::test]
async fn directory_navigation() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;

    client.send("PWD").await;
    assert_eq!(client.line().await, "257 \"/\" is your current directory");

    client.send("MKD music").await;
    assert_eq!(client.line().await, "257 \"music\" created");
    client.send("MKD music").await;
    assert_eq!(
        client.line().await,
        "521 \"music\" directory already exists"
    );

    client.send("CWD music").await;
    assert_eq!(client.line().await, "250 Directory successfully changed.");
    client.send("PWD").await;
    assert_eq!(
        client.line().await,
        "257 \"/music\" is your current directory"
    );
    client.send("CWD .").await;
    assert_eq!(
        client.line().await,
        "257 \"/music\" is your current directory"
    );

    client.send("CDUP").await;
    assert_eq!(client.line().await, "200 Ok. Current directory is /");

    client.send("CWD nowhere").await;
    assert_eq!(client.line().await, "550 Failed to change directory.");
}

#[tokio::test]
async fn size_dele_and_rename() {
    let (addr, root) = spawn_server(2).await;
    std::fs::write(root.path().join("notes.txt"), b"hello world").unwrap();
    let mut client = Client::login(addr).await;

    client.send("SIZE notes.txt").await;
    assert_eq!(client.line().await, "213 11");
    client.send("SIZE missing.txt").await;
    assert_eq!(client.line().await, "550 No such file");

    client.send("RNFR notes.txt").await;
    assert_eq!(
        client.line().await,
        "350 RNFR accepted - file exists, ready for destination"
    );
    client.send("RNTO renamed.txt").await;
    assert_eq!(client.line().await, "250 File successfully renamed or moved");
    assert!(root.path().join("renamed.txt").exists());

    client.send("DELE renamed.txt").await;
    assert_eq!(client.line().await, "250 Deleted renamed.txt");
    client.send("DELE renamed.txt").await;
    assert_eq!(client.line().await, "550 File renamed.txt not found");
}

#[tokio::test]
async fn mdtm_set_and_get_rounds_odd_seconds_down() {
    let (addr, root) = spawn_server(2).await;
    std::fs::write(root.path().join("old.txt"), b"x").unwrap();
    let mut client = Client::login(addr).await;

    client.send("MDTM 20200102030405 old.txt").await;
    assert_eq!(client.line().await, "200 Ok");
    client.send("MDTM old.txt").await;
    // FAT times have two-second resolution.
    assert_eq!(client.line().await, "213 20200102030404");
}

#[tokio::test]
async fn feat_lists_extensions() {
    let (addr, _root) = spawn_server(2).await;
    let mut client = Client::login(addr).await;
    client.send("FEAT").await;
    assert_eq!(client.line().await, "211-Extensions supported:");
    let mut features = Vec::new();
    loop {
        let line = client.line().await;
        if line == "211 End." {
            break;
        }
        features.push(line.trim().to_string());
    }
    assert!(features.contains(&"MDTM".to_string()));
    assert!(features.contains(&"MLSD".to_string()));
    assert!(features.contains(&"SIZE".to_string()));
    assert!(features.contains(&"SITE FREE".to_string()));
}

#[tokio::test]
async fn stat_reports_occupancy() {
    let (addr, _root) = spawn_server(3).await;
    let mut client = Client::login(addr).await;
    client.send("STAT").await;
    assert_eq!(client.line().await, "211-FTP server status");
    assert!(client.line().await.contains("Local time is"));
    assert!(client
        .line()
        .await
        .contains("1 user(s) currently connected to up to 3"));
    assert!(client.line().await.contains("minutes of inactivity"));
    assert_eq!(client.line().await, "211 End.");
}

#[tokio::test]
async fn surplus_connection_waits_for_a_free_slot() {
    let (addr, _root) = spawn_server(1).await;
    let mut first = Client::login(addr).await;

    // All slots are busy: the second connection must sit in the backlog,
    // unanswered.
    let mut second = Client::connect(addr).await;
    let mut probe = String::new();
    let pending = timeout(
        Duration::from_millis(400),
        second.reader.read_line(&mut probe),
    )
    .await;
    assert!(pending.is_err(), "second client was served too early");

    first.send("QUIT").await;
    assert_eq!(first.line().await, "221 Goodbye");
    drop(first);

    // The freed slot picks the pending connection up within a poll cycle.
    second.expect_greeting().await;
}
