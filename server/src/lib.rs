pub mod server;

use futures::SinkExt;
use nfsopen_proto::codec::NfsProtoCodec;
use tokio::net::TcpListener;
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::{error, info, span, trace, Level};
pub use vfs;
pub use vfs::VfsPath;

use self::server::clientmanager::ClientManagerHandle;
use self::server::filemanager::FileManagerHandle;
use self::server::state::StateManagerHandle;
use crate::server::request::NfsRequest;
use crate::server::{NFSService, NfsProtoImpl};

/// An NFSv4.0 server bound to a single virtual filesystem root.
///
/// Client, file and open/lock state all live for the process lifetime of
/// this server: there is no persistence across restarts, matching a server
/// boot_time that resets every time `start` spins up a fresh runtime.
pub struct NFSServer {
    /// The listening address of the server
    bind: String,
    /// The root of this NFS file system
    root: VfsPath,
    /// NFSv4.0 service
    service_0: Option<server::nfs40::NFS40Server>,
    // ToDo: add more minor version support
}

impl NFSServer {
    // This method will help users to discover the builder
    pub fn builder(root: VfsPath) -> ServerBuilder {
        ServerBuilder::new(root)
    }

    /// Start the NFS server, serve forever.
    /// This starts a tokio runtime and serves the NFS requests.
    pub fn start(&self) {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                let listener = TcpListener::bind(self.bind.clone()).await.unwrap();
                info!(%self.bind, "Server listening");

                // start the client manager, file manager and open/lock state
                // manager; configs go here
                let client_manager_handle = ClientManagerHandle::new();
                let file_manager_handle = FileManagerHandle::new(self.root.clone(), None);
                let state_manager_handle = StateManagerHandle::new();
                // stamped once for the process lifetime of this server, not
                // per-request, so clientid verifiers can detect a reboot
                let boot_time = std::time::UNIX_EPOCH.elapsed().unwrap().as_secs();

                loop {
                    match listener.accept().await {
                        Ok((stream, addr)) => {
                            let _ = stream.set_nodelay(true);
                            info!(%addr, "Client connected");
                            let _span = span!(Level::TRACE, "client");
                            // Reading NFS RPC messages over record marking codec
                            let mut nfs_transport = Framed::new(stream, NfsProtoCodec::new());

                            loop {
                                let msg = nfs_transport.next().await;
                                match msg {
                                    Some(Ok(msg)) => {
                                        // create an NFS request carrying handles to the
                                        // shared client/file/state managers
                                        let request = NfsRequest::new(
                                            addr.to_string(),
                                            client_manager_handle.clone(),
                                            file_manager_handle.clone(),
                                            state_manager_handle.clone(),
                                            boot_time,
                                        );
                                        // ToDo implement and select correct version of NFS protocol, this services all with minor version 0
                                        let nfs_protocol = self.service_0.as_ref().unwrap();
                                        let service = NFSService::new(nfs_protocol.clone());

                                        let resp = service.call(msg, request).await;
                                        match nfs_transport.send(resp).await {
                                            Ok(_) => {
                                                trace!("response sent");
                                            }
                                            Err(e) => {
                                                error!("couldn't send response: {:?}", e);
                                                break;
                                            }
                                        }
                                    }
                                    Some(Err(e)) => {
                                        error!("couldn't get message: {:?}", e);
                                        break;
                                    }
                                    None => {
                                        // client closed connection
                                        info!(%addr, "Client disconnected");
                                        break;
                                    }
                                }
                            }
                        }
                        Err(e) => error!("couldn't get client: {:?}", e),
                    }
                }
            });
    }
}

pub struct ServerBuilder {
    /// The listening address of the server
    bind: String,
    /// The root of this NFS file system
    root: VfsPath,
}

impl ServerBuilder {
    pub fn new(root: VfsPath) -> Self {
        ServerBuilder {
            bind: "127.0.0.1:11112".to_string(),
            root,
        }
    }

    pub fn bind(&mut self, bind: &str) -> &mut Self {
        self.bind = bind.to_string();
        self
    }

    pub fn build(&self) -> NFSServer {
        NFSServer {
            bind: self.bind.clone(),
            root: self.root.clone(),
            service_0: Some(server::nfs40::NFS40Server::new()),
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use vfs::{MemoryFS, VfsPath};

    use nfsopen_proto::nfs4_proto::{CbClient4, ClientAddr4, NfsClientId4, SetClientId4args};

    use crate::server::{
        clientmanager::ClientManagerHandle, filemanager::FileManagerHandle,
        request::NfsRequest, state::StateManagerHandle,
    };

    pub fn create_dummyfs() -> VfsPath {
        let root: VfsPath = MemoryFS::new().into();
        root.create_dir_all().unwrap();
        root
    }

    pub fn create_fake_fs() -> VfsPath {
        let root: VfsPath = MemoryFS::new().into();
        let file1 = root.join("file1.txt").unwrap();
        file1
            .create_file()
            .unwrap()
            .write_all(b"Hello, loooooooong world!")
            .unwrap();

        let dir1 = root.join("dir1").unwrap();
        dir1.create_dir_all().unwrap();

        let file2 = dir1.join("file2.txt").unwrap();
        file2
            .create_file()
            .unwrap()
            .write_all(b"Hello, file2!")
            .unwrap();

        root
    }

    pub fn create_client(verifier: [u8; 8], id: String) -> SetClientId4args {
        SetClientId4args {
            client: NfsClientId4 { verifier, id },
            callback: CbClient4 {
                cb_program: 0,
                cb_location: ClientAddr4 {
                    rnetid: "tcp".to_string(),
                    raddr: "127.0.0.1.149.18".to_string(),
                },
            },
            callback_ident: 1,
        }
    }

    pub async fn create_nfs40_server(root: Option<VfsPath>) -> NfsRequest {
        let root = root.unwrap_or_else(create_dummyfs);

        let client_manager_handle = ClientManagerHandle::new();
        let file_manager_handle = FileManagerHandle::new(root, None);
        let state_manager_handle = StateManagerHandle::new();
        let boot_time = std::time::UNIX_EPOCH.elapsed().unwrap().as_secs();

        NfsRequest::new(
            "127.0.0.1:12345".to_owned(),
            client_manager_handle,
            file_manager_handle,
            state_manager_handle,
            boot_time,
        )
    }
}
