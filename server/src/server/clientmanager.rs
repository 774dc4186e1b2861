use std::collections::HashMap;
use std::fmt;

use multi_index_map::MultiIndexMap;
use rand::distributions::Uniform;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};

use nfsopen_proto::nfs4_proto::NfsStat4;

type ClientDb = MultiIndexClientEntryMap;

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct ClientCallback {
    pub program: u32,
    pub rnetid: String,
    pub raddr: String,
    pub callback_ident: u32,
}

// https://datatracker.ietf.org/doc/html/rfc7530#section-16.33.5
#[derive(MultiIndexMap, Debug, Clone)]
#[multi_index_derive(Debug, Clone)]
pub struct ClientEntry {
    // https://datatracker.ietf.org/doc/html/rfc7530#section-3.3.3
    #[multi_index(hashed_non_unique)]
    pub principal: Option<String>,
    #[multi_index(hashed_non_unique)]
    pub verifier: [u8; 8],
    #[multi_index(hashed_non_unique)]
    pub id: String,
    #[multi_index(hashed_non_unique)]
    pub clientid: u64,
    pub callback: ClientCallback,
    #[multi_index(hashed_unique)]
    pub setclientid_confirm: [u8; 8],
    pub confirmed: bool,
}

#[derive(Debug, Clone)]
pub struct ClientManagerError {
    pub nfs_error: NfsStat4,
}

impl From<NfsStat4> for ClientManagerError {
    fn from(nfs_error: NfsStat4) -> Self {
        ClientManagerError { nfs_error }
    }
}

impl fmt::Display for ClientManagerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ClientManagerError: {:?}", self.nfs_error)
    }
}

/// Owns the client-id registry and the per-connection current-filehandle
/// table. Runs as a single actor task; all mutation is single-threaded,
/// which is what gives `upsert_client`/`confirm_client` their atomicity.
struct ClientManagerInner {
    db: ClientDb,
    client_id_seq: u64,
    filehandles: HashMap<String, Vec<u8>>,
}

impl ClientManagerInner {
    fn new() -> Self {
        ClientManagerInner {
            db: ClientDb::default(),
            client_id_seq: 0,
            filehandles: HashMap::new(),
        }
    }

    fn get_next_client_id(&mut self) -> u64 {
        self.client_id_seq += 1;
        self.client_id_seq
    }

    fn set_current_fh(&mut self, client_addr: String, filehandle: Vec<u8>) {
        self.filehandles.insert(client_addr, filehandle);
    }

    fn get_current_fh(&mut self, client_addr: String) -> Option<Vec<u8>> {
        self.filehandles.get(&client_addr).cloned()
    }

    fn upsert_client(
        &mut self,
        verifier: [u8; 8],
        id: String,
        callback: ClientCallback,
        principal: Option<String>,
    ) -> Result<ClientEntry, ClientManagerError> {
        let entries = self.db.get_by_id(&id);
        let mut existing_clientid: Option<u64> = None;
        if !entries.is_empty() {
            // this is an update attempt
            let mut entries_to_remove = Vec::new();
            for entry in entries.clone() {
                if entry.confirmed && entry.principal != principal {
                    // For any confirmed record with the same id string x, if the recorded
                    // principal does not match that of the SETCLIENTID call, then the
                    // server returns an NFS4ERR_CLID_INUSE error.
                    return Err(NfsStat4::Nfs4errClidInuse.into());
                }
                if !entry.confirmed {
                    entries_to_remove.push(entry.clone());
                }
                existing_clientid = Some(entry.clientid);
            }

            entries_to_remove.iter().for_each(|entry| {
                self.db.remove_by_setclientid_confirm(&entry.setclientid_confirm);
            });
        }

        Ok(self.add_client_record(verifier, id, callback, principal, existing_clientid))
    }

    fn add_client_record(
        &mut self,
        verifier: [u8; 8],
        id: String,
        callback: ClientCallback,
        principal: Option<String>,
        client_id: Option<u64>,
    ) -> ClientEntry {
        let client_id = client_id.unwrap_or_else(|| self.get_next_client_id());
        let mut rng = rand::thread_rng();
        let setclientid_confirm_vec: Vec<u8> =
            (0..8).map(|_| rng.sample(Uniform::new(0, 255))).collect();
        let setclientid_confirm: [u8; 8] = setclientid_confirm_vec.try_into().unwrap();
        let client = ClientEntry {
            principal,
            verifier,
            id,
            clientid: client_id,
            callback,
            setclientid_confirm,
            confirmed: false,
        };

        self.db.insert(client.clone());
        client
    }

    fn confirm_client(
        &mut self,
        client_id: u64,
        setclientid_confirm: [u8; 8],
        principal: Option<String>,
    ) -> Result<ClientEntry, ClientManagerError> {
        let entries = self.db.get_by_clientid(&client_id);
        let mut old_confirmed: Option<ClientEntry> = None;
        let mut new_confirmed: Option<ClientEntry> = None;
        if entries.is_empty() {
            return Err(NfsStat4::Nfs4errStaleClientid.into());
        }

        for entry in entries {
            if entry.principal != principal {
                return Err(NfsStat4::Nfs4errClidInuse.into());
            }
            if entry.confirmed && entry.setclientid_confirm != setclientid_confirm {
                old_confirmed = Some(entry.clone());
            }
            if entry.setclientid_confirm == setclientid_confirm {
                let mut update_entry = entry.clone();
                update_entry.confirmed = true;
                new_confirmed = Some(update_entry);
            }
        }

        if let Some(old) = old_confirmed {
            self.db.remove_by_setclientid_confirm(&old.setclientid_confirm);
        }

        match new_confirmed {
            Some(new_confirmed) => {
                self.db
                    .modify_by_setclientid_confirm(&new_confirmed.setclientid_confirm, |c| {
                        c.confirmed = true;
                    });
                Ok(new_confirmed)
            }
            None => Err(NfsStat4::Nfs4errStaleClientid.into()),
        }
    }

    fn renew(&mut self, client_id: u64) -> Result<(), ClientManagerError> {
        match self.get_client_confirmed(client_id) {
            Some(_) => Ok(()),
            None => Err(NfsStat4::Nfs4errStaleClientid.into()),
        }
    }

    fn get_record_count(&mut self) -> usize {
        self.db.len()
    }

    fn remove_client(&mut self, client_id: u64) {
        self.db.remove_by_clientid(&client_id);
    }

    fn get_client_confirmed(&mut self, clientid: u64) -> Option<ClientEntry> {
        let records = self.db.get_by_clientid(&clientid);
        records.into_iter().find(|r| r.confirmed).cloned()
    }
}

enum ClientManagerMessage {
    UpsertClient {
        verifier: [u8; 8],
        id: String,
        callback: ClientCallback,
        principal: Option<String>,
        respond_to: oneshot::Sender<Result<ClientEntry, ClientManagerError>>,
    },
    ConfirmClient {
        client_id: u64,
        setclientid_confirm: [u8; 8],
        principal: Option<String>,
        respond_to: oneshot::Sender<Result<ClientEntry, ClientManagerError>>,
    },
    Renew {
        client_id: u64,
        respond_to: oneshot::Sender<Result<(), ClientManagerError>>,
    },
    GetClientConfirmed {
        client_id: u64,
        respond_to: oneshot::Sender<Option<ClientEntry>>,
    },
    RemoveClient {
        client_id: u64,
    },
    SetCurrentFilehandle {
        client_addr: String,
        filehandle: Vec<u8>,
    },
    GetCurrentFilehandle {
        client_addr: String,
        respond_to: oneshot::Sender<Option<Vec<u8>>>,
    },
    GetRecordCount {
        respond_to: oneshot::Sender<usize>,
    },
}

async fn run_client_manager(mut inner: ClientManagerInner, mut receiver: mpsc::Receiver<ClientManagerMessage>) {
    while let Some(msg) = receiver.recv().await {
        match msg {
            ClientManagerMessage::UpsertClient {
                verifier,
                id,
                callback,
                principal,
                respond_to,
            } => {
                let _ = respond_to.send(inner.upsert_client(verifier, id, callback, principal));
            }
            ClientManagerMessage::ConfirmClient {
                client_id,
                setclientid_confirm,
                principal,
                respond_to,
            } => {
                let _ = respond_to.send(inner.confirm_client(client_id, setclientid_confirm, principal));
            }
            ClientManagerMessage::Renew { client_id, respond_to } => {
                let _ = respond_to.send(inner.renew(client_id));
            }
            ClientManagerMessage::GetClientConfirmed { client_id, respond_to } => {
                let _ = respond_to.send(inner.get_client_confirmed(client_id));
            }
            ClientManagerMessage::RemoveClient { client_id } => {
                inner.remove_client(client_id);
            }
            ClientManagerMessage::SetCurrentFilehandle {
                client_addr,
                filehandle,
            } => {
                inner.set_current_fh(client_addr, filehandle);
            }
            ClientManagerMessage::GetCurrentFilehandle { client_addr, respond_to } => {
                let _ = respond_to.send(inner.get_current_fh(client_addr));
            }
            ClientManagerMessage::GetRecordCount { respond_to } => {
                let _ = respond_to.send(inner.get_record_count());
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientManagerHandle {
    sender: mpsc::Sender<ClientManagerMessage>,
}

impl ClientManagerHandle {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(32);
        tokio::spawn(run_client_manager(ClientManagerInner::new(), receiver));
        Self { sender }
    }

    pub async fn upsert_client(
        &self,
        verifier: [u8; 8],
        id: String,
        callback: ClientCallback,
        principal: Option<String>,
    ) -> Result<ClientEntry, ClientManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ClientManagerMessage::UpsertClient {
                verifier,
                id,
                callback,
                principal,
                respond_to: tx,
            })
            .await
            .map_err(|_| ClientManagerError::from(NfsStat4::Nfs4errServerfault))?;
        rx.await.map_err(|_| NfsStat4::Nfs4errServerfault.into())?
    }

    pub async fn confirm_client(
        &self,
        client_id: u64,
        setclientid_confirm: [u8; 8],
        principal: Option<String>,
    ) -> Result<ClientEntry, ClientManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ClientManagerMessage::ConfirmClient {
                client_id,
                setclientid_confirm,
                principal,
                respond_to: tx,
            })
            .await
            .map_err(|_| ClientManagerError::from(NfsStat4::Nfs4errServerfault))?;
        rx.await.map_err(|_| NfsStat4::Nfs4errServerfault.into())?
    }

    pub async fn renew(&self, client_id: u64) -> Result<(), ClientManagerError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ClientManagerMessage::Renew { client_id, respond_to: tx })
            .await
            .map_err(|_| ClientManagerError::from(NfsStat4::Nfs4errServerfault))?;
        rx.await.map_err(|_| NfsStat4::Nfs4errServerfault.into())?
    }

    pub async fn get_client_confirmed(&self, client_id: u64) -> Option<ClientEntry> {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(ClientManagerMessage::GetClientConfirmed { client_id, respond_to: tx })
            .await
            .is_err()
        {
            return None;
        }
        rx.await.unwrap_or(None)
    }

    pub async fn remove_client(&self, client_id: u64) {
        let _ = self
            .sender
            .send(ClientManagerMessage::RemoveClient { client_id })
            .await;
    }

    pub async fn set_current_filehandle(&self, client_addr: String, filehandle: Vec<u8>) {
        let _ = self
            .sender
            .send(ClientManagerMessage::SetCurrentFilehandle {
                client_addr,
                filehandle,
            })
            .await;
    }

    pub async fn get_current_filehandle(&self, client_addr: String) -> Option<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(ClientManagerMessage::GetCurrentFilehandle { client_addr, respond_to: tx })
            .await
            .is_err()
        {
            return None;
        }
        rx.await.unwrap_or(None)
    }

    pub async fn get_record_count(&self) -> usize {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(ClientManagerMessage::GetRecordCount { respond_to: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

impl Default for ClientManagerHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use nfsopen_proto::nfs4_proto::NfsStat4;

    use super::{ClientCallback, ClientManagerHandle};

    #[tokio::test]
    async fn test_upsert_clients_no_principals() {
        let manager = ClientManagerHandle::new();

        let verifier = [0; 8];
        let id = "test".to_string();
        let callback = ClientCallback {
            program: 0,
            rnetid: "tcp".to_string(),
            raddr: "".to_string(),
            callback_ident: 0,
        };

        let client = manager
            .upsert_client(verifier, id.clone(), callback.clone(), None)
            .await
            .unwrap();
        assert_eq!(client.id, id);
        assert_eq!(client.verifier, verifier);
        assert_eq!(client.callback, callback);

        let updated_callback = ClientCallback {
            program: 10,
            rnetid: "tcp".to_string(),
            raddr: "".to_string(),
            callback_ident: 2,
        };

        let same_client = manager
            .upsert_client(verifier, id.clone(), updated_callback.clone(), None)
            .await
            .unwrap();
        assert_eq!(same_client.id, id);
        assert_eq!(same_client.verifier, verifier);
        assert_eq!(same_client.callback, updated_callback);
        assert_eq!(same_client.clientid, client.clientid);

        // confirm after update
        let err_confirm = manager
            .confirm_client(client.clientid, client.setclientid_confirm, None)
            .await;
        assert_eq!(
            err_confirm.unwrap_err().nfs_error,
            NfsStat4::Nfs4errStaleClientid
        );

        let confirmed_client = manager
            .confirm_client(client.clientid, same_client.setclientid_confirm, None)
            .await
            .unwrap();
        assert!(confirmed_client.confirmed);
        assert_eq!(confirmed_client.clientid, client.clientid);

        let other_callback = ClientCallback {
            program: 1,
            rnetid: "tcp".to_string(),
            raddr: "".to_string(),
            callback_ident: 0,
        };
        let err_client = manager
            .upsert_client(verifier, id, other_callback.clone(), Some("LINUX".to_string()))
            .await;
        assert_eq!(err_client.unwrap_err().nfs_error, NfsStat4::Nfs4errClidInuse);

        let stale_client = manager.confirm_client(1234, client.setclientid_confirm, None).await;
        assert_eq!(
            stale_client.unwrap_err().nfs_error,
            NfsStat4::Nfs4errStaleClientid
        );

        let confirmed = manager.get_client_confirmed(client.clientid).await;
        assert_eq!(confirmed.clone().unwrap().clientid, client.clientid);
        assert!(confirmed.unwrap().confirmed);

        let c = manager.get_record_count().await;
        assert_eq!(c, 1);
        manager.remove_client(client.clientid).await;
        let c = manager.get_record_count().await;
        assert_eq!(c, 0);
    }

    #[tokio::test]
    async fn test_upsert_clients_double_confirm() {
        let manager = ClientManagerHandle::new();

        let verifier = [0; 8];
        let id = "test".to_string();
        let callback = ClientCallback {
            program: 0,
            rnetid: "tcp".to_string(),
            raddr: "".to_string(),
            callback_ident: 0,
        };

        let client = manager
            .upsert_client(verifier, id.clone(), callback.clone(), None)
            .await
            .unwrap();

        let confirmed_client = manager
            .confirm_client(client.clientid, client.setclientid_confirm, None)
            .await
            .unwrap();
        assert!(confirmed_client.confirmed);
        assert_eq!(confirmed_client.clientid, client.clientid);
        let confirmed_client = manager
            .confirm_client(client.clientid, client.setclientid_confirm, None)
            .await
            .unwrap();
        assert!(confirmed_client.confirmed);
        assert_eq!(confirmed_client.clientid, client.clientid);
    }

    #[tokio::test]
    async fn test_upsert_clients_principals() {
        let manager = ClientManagerHandle::new();

        let verifier = [0; 8];
        let id = "test".to_string();
        let callback = ClientCallback {
            program: 0,
            rnetid: "tcp".to_string(),
            raddr: "".to_string(),
            callback_ident: 0,
        };

        let client = manager
            .upsert_client(verifier, id.clone(), callback.clone(), Some("Linux".to_string()))
            .await
            .unwrap();

        let same_client = manager
            .confirm_client(client.clientid, client.setclientid_confirm, Some("Linux".to_string()))
            .await
            .unwrap();

        assert_eq!(same_client.id, id);
        assert_eq!(same_client.verifier, verifier);
        assert_eq!(same_client.callback, callback);
        assert_eq!(same_client.clientid, client.clientid);
        assert_eq!(same_client.principal, Some("Linux".to_string()));
        assert!(same_client.confirmed);
    }

    #[tokio::test]
    async fn test_upsert_clients_async() {
        use rand::distributions::Alphanumeric;
        use rand::Rng;

        let manager = ClientManagerHandle::new();

        async fn client_spawn(manager: ClientManagerHandle) {
            let verifier = [0; 8];
            let id: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(12)
                .map(char::from)
                .collect();
            let callback = ClientCallback {
                program: 0,
                rnetid: "tcp".to_string(),
                raddr: "".to_string(),
                callback_ident: 0,
            };

            let client = manager
                .upsert_client(verifier, id.clone(), callback.clone(), None)
                .await
                .unwrap();

            let confirmed_client = manager
                .confirm_client(client.clientid, client.setclientid_confirm, None)
                .await
                .unwrap();
            assert!(confirmed_client.confirmed);
        }

        let mut jobs = Vec::new();
        for _ in 0..1000 {
            jobs.push(client_spawn(manager.clone()));
        }

        let now = Instant::now();
        let _ = futures::future::join_all(jobs).await;
        let eps = now.elapsed();

        assert_eq!(manager.get_record_count().await, 1000);
        println!("Elapsed time: {:?}", eps.as_millis());
    }
}
