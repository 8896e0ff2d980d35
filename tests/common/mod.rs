use std::error::Error;

use bluepages::{Bluepages, Config, ConnectionConfig, HttpConfig, LdapConfig, WalkConfig};
use ldap3::LdapConnAsync;
use serde_json::{json, Value};
use url::Url;
use wiremock::{
	matchers::{method, path},
	Mock, MockServer, ResponseTemplate,
};

pub const LDAP_URL: &str = "ldap://localhost:1389";
pub const PHOTO_URL: &str = "http://photos.example.org/image";

/// Client configuration pointing at the mock HTTP API and the docker LDAP
/// server.
pub fn config(server: &MockServer) -> Result<Config, Box<dyn Error>> {
	Ok(Config {
		api_url: Url::parse(&server.uri())?,
		photo_url: Url::parse(PHOTO_URL)?,
		http: HttpConfig::default(),
		ldap: LdapConfig {
			url: Url::parse(LDAP_URL)?,
			search_base: "ou=users,dc=example,dc=org".to_owned(),
			time_limit: 5,
			connection: ConnectionConfig::default(),
		},
		walk: WalkConfig::default(),
	})
}

pub fn client(server: &MockServer) -> Result<Bluepages, Box<dyn Error>> {
	Ok(Bluepages::new(config(server)?)?)
}

pub fn person_dn(uid: &str) -> String {
	format!("uid={uid},c=US,ou=bluepages,o=ibm.com")
}

pub fn profile_xml(dn: &str, attrs: &[(&str, &str)]) -> String {
	let attrs: String = attrs
		.iter()
		.map(|(name, value)| format!("<attr name=\"{name}\">\n<value>{value}</value>\n</attr>\n"))
		.collect();
	format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<directory-entries>\n<entry \
		 dn=\"{dn}\">\n{attrs}</entry>\n<return-code>0</return-code>\n<error></error>\n<count>1</count>\n</directory-entries>"
	)
}

pub fn empty_profile_xml() -> String {
	"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<directory-entries>\n<return-code>0</return-code>\n<error></error>\n<count>0</count>\n</directory-entries>"
		.to_owned()
}

/// A `byjson` report list of people in `c=US,ou=bluepages,o=ibm.com`.
pub fn reports_json(uids: &[&str]) -> Value {
	let entries: Vec<Value> = uids
		.iter()
		.map(|uid| {
			json!({
				"dn": person_dn(uid),
				"attribute": [
					{ "name": "uid", "value": [uid] },
					{ "name": "c", "value": ["US"] },
					{ "name": "ou", "value": ["bluepages"] },
					{ "name": "o", "value": ["ibm.com"] },
					{ "name": "cn", "value": [format!("Person {uid}"), format!("{uid}")] },
					{ "name": "mail", "value": [format!("{uid}@us.ibm.com")] },
					{ "name": "workloc", "value": ["RAL"] },
				]
			})
		})
		.collect();
	json!({ "search": { "entry": entries, "return": { "code": 0, "count": uids.len() } } })
}

pub async fn mount_profile(server: &MockServer, identifier: &str, body: String) {
	Mock::given(method("GET"))
		.and(path(format!("/mail={identifier}.list/byxml")))
		.respond_with(ResponseTemplate::new(200).set_body_string(body))
		.mount(server)
		.await;
}

pub async fn mount_reports(server: &MockServer, manager_uid: &str, uids: &[&str]) {
	Mock::given(method("GET"))
		.and(path(format!("/manager={}.list/byjson", person_dn(manager_uid))))
		.respond_with(ResponseTemplate::new(200).set_body_json(reports_json(uids)))
		.mount(server)
		.await;
}

pub async fn ldap_connect() -> Result<ldap3::Ldap, Box<dyn Error>> {
	let (conn, mut ldap) = LdapConnAsync::new(LDAP_URL).await?;
	let _handle = tokio::spawn(async move {
		if let Err(err) = conn.drive().await {
			panic!("Ldap connection error {err}");
		}
	});
	ldap.simple_bind("cn=admin,dc=example,dc=org", "adminpassword").await?;
	Ok(ldap)
}

pub async fn ldap_add_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.add(
		&format!("ou={},dc=example,dc=org", ou),
		vec![("objectClass", ["organizationalUnit"].into())],
	)
	.await?
	.success()?;
	Ok(())
}

pub async fn ldap_delete_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.delete(&format!("ou={},dc=example,dc=org", ou)).await?.success()?;
	Ok(())
}

pub fn ldap_user_dn(uid: &str) -> String {
	format!("uid={},ou=users,dc=example,dc=org", uid)
}

pub async fn ldap_add_user(
	ldap: &mut ldap3::Ldap,
	uid: &str,
	password: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.add(
		&ldap_user_dn(uid),
		vec![
			("objectClass", ["inetOrgPerson"].into()),
			("cn", [uid].into()),
			("sn", [uid].into()),
			("userPassword", [password].into()),
		],
	)
	.await?
	.success()?;
	Ok(())
}

pub async fn ldap_delete_user(ldap: &mut ldap3::Ldap, uid: &str) -> Result<(), Box<dyn Error>> {
	ldap.delete(&ldap_user_dn(uid)).await?.success()?;
	Ok(())
}
