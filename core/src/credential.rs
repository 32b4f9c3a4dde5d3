// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use crate::utils::Redact;

/// Credential for the Rackspace API.
#[derive(Clone, Default)]
pub struct Credential {
    /// User key, sent in clear as the first segment of the signature header.
    pub user_key: String,
    /// Secret key, only ever used as signing input.
    pub secret_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(user_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Check if both keys are present.
    ///
    /// Requests made with an incomplete credential carry an empty signature.
    pub fn is_valid(&self) -> bool {
        !self.user_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_key", &Redact::from(&self.user_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}
