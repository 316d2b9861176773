use super::*;

impl Backend for RemoteClient {
    fn select(&self, table: Table) -> Result<SelectResponse, RemoteError> {
        let label = format!("select {}", table);
        self.send_json(self.client.get(self.url(&format!("/rest/{}", table))), &label)
    }

    fn insert(&self, table: Table, row: Row) -> Result<VersionedRow, RemoteError> {
        let label = format!("insert {}", table);
        self.send_json(
            self.client
                .post(self.url(&format!("/rest/{}", table)))
                .json(&row),
            &label,
        )
    }

    fn insert_if_absent(
        &self,
        table: Table,
        row: Row,
        unique: &[&str],
    ) -> Result<VersionedRow, RemoteError> {
        let label = format!("insert {} if absent", table);
        self.send_json(
            self.client
                .post(self.url(&format!("/rest/{}", table)))
                .query(&[("unique", unique.join(","))])
                .json(&row),
            &label,
        )
    }

    fn update(&self, table: Table, id: &str, patch: Row) -> Result<VersionedRow, RemoteError> {
        let label = format!("update {} {}", table, id);
        self.send_json(
            self.client
                .patch(self.url(&format!("/rest/{}/{}", table, id)))
                .json(&patch),
            &label,
        )
    }

    fn delete(&self, table: Table, id: &str) -> Result<VersionedRow, RemoteError> {
        let label = format!("delete {} {}", table, id);
        self.send_json(
            self.client
                .delete(self.url(&format!("/rest/{}/{}", table, id))),
            &label,
        )
    }

    fn delete_where(
        &self,
        table: Table,
        column: &str,
        value: &str,
    ) -> Result<Vec<VersionedRow>, RemoteError> {
        let label = format!("delete {} where {}", table, column);
        let out: DeletedRows = self.send_json(
            self.client
                .delete(self.url(&format!("/rest/{}", table)))
                .query(&[(column, value)]),
            &label,
        )?;
        Ok(out.rows)
    }

    fn head(&self) -> Result<u64, RemoteError> {
        let out: HeadResponse =
            self.send_json(self.client.get(self.url("/changes/head")), "change-feed head")?;
        Ok(out.seq)
    }

    fn changes(
        &self,
        table: Table,
        since: u64,
        wait: Duration,
    ) -> Result<ChangeBatch, RemoteError> {
        let label = format!("changes {}", table);
        self.send_json(
            self.client
                .get(self.url("/changes"))
                .query(&[
                    ("table", table.as_str().to_string()),
                    ("since", since.to_string()),
                    ("wait_ms", wait.as_millis().to_string()),
                ])
                .timeout(wait + Duration::from_secs(10)),
            &label,
        )
    }

    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Identity>, RemoteError> {
        let req = self
            .client
            .post(self.url("/rpc/verify_credentials"))
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        // The RPC answers `null` for a wrong email/password pair.
        self.send_json(req, "verify credentials")
    }
}
