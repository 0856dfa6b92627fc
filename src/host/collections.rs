//! Persistent collections over host storage
//!
//! A `LookupMap` owns nothing but its key prefix; every entry lives in the
//! host's key-value store under `prefix ++ account_id`. Values use compact
//! fixed encodings so that storage metering is predictable.

use crate::host::{Host, HostError};
use crate::token::{parse_account_id, AccountId};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Values that can be stored in a `LookupMap`
pub trait StorageValue: Sized {
    fn to_storage_bytes(&self) -> Vec<u8>;
    fn from_storage_bytes(bytes: &[u8]) -> Result<Self, String>;
}

/// 16-byte little-endian, constant width regardless of magnitude
impl StorageValue for u128 {
    fn to_storage_bytes(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn from_storage_bytes(bytes: &[u8]) -> Result<Self, String> {
        let raw: [u8; 16] = bytes
            .try_into()
            .map_err(|_| format!("expected 16 bytes, found {}", bytes.len()))?;
        Ok(u128::from_le_bytes(raw))
    }
}

impl StorageValue for AccountId {
    fn to_storage_bytes(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }

    fn from_storage_bytes(bytes: &[u8]) -> Result<Self, String> {
        let s = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
        parse_account_id(s).map_err(|e| e.to_string())
    }
}

/// Prefixed map from account id to `V` backed by host storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LookupMap<V> {
    prefix: String,
    #[serde(skip)]
    _value: PhantomData<V>,
}

impl<V: StorageValue> LookupMap<V> {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            _value: PhantomData,
        }
    }

    /// Raw storage key for an entry
    pub fn storage_key(&self, key: &AccountId) -> Vec<u8> {
        let key = key.as_str();
        let mut raw = Vec::with_capacity(self.prefix.len() + key.len());
        raw.extend_from_slice(self.prefix.as_bytes());
        raw.extend_from_slice(key.as_bytes());
        raw
    }

    fn decode(&self, key: &AccountId, bytes: &[u8]) -> Result<V, HostError> {
        V::from_storage_bytes(bytes).map_err(|reason| HostError::CorruptValue {
            key: format!("{}{}", self.prefix, key),
            reason,
        })
    }

    pub fn get<H: Host + ?Sized>(&self, host: &H, key: &AccountId) -> Result<Option<V>, HostError> {
        match host.storage_read(&self.storage_key(key)) {
            Some(bytes) => self.decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains_key<H: Host + ?Sized>(&self, host: &H, key: &AccountId) -> bool {
        host.storage_has_key(&self.storage_key(key))
    }

    /// Insert a value, returning the previous one
    pub fn insert<H: Host + ?Sized>(
        &self,
        host: &mut H,
        key: &AccountId,
        value: &V,
    ) -> Result<Option<V>, HostError> {
        match host.storage_write(&self.storage_key(key), &value.to_storage_bytes()) {
            Some(old) => self.decode(key, &old).map(Some),
            None => Ok(None),
        }
    }

    /// Remove an entry, returning its value
    pub fn remove<H: Host + ?Sized>(
        &self,
        host: &mut H,
        key: &AccountId,
    ) -> Result<Option<V>, HostError> {
        match host.storage_remove(&self.storage_key(key)) {
            Some(old) => self.decode(key, &old).map(Some),
            None => Ok(None),
        }
    }
}
