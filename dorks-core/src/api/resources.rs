// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resource helpers built on endpoint descriptors.

use serde_json::json;
use tracing::info;
use url::form_urlencoded;

use crate::network::{NetworkError, ResponseEnvelope};

use super::client::{timestamp, Client};
use super::endpoint;
use super::error::{DorksError, DorksResult};
use super::models::{
    ChatMessage, Community, CommunityListResponse, LinkInfo, LinkResolutionResponse,
    MediaUploadResponse, MessagePage, MessageResponse, Thread, ThreadListResponse, ThreadResponse,
    User, UserProfileResponse, Wallet, WalletResponse,
};

impl Client {
    // === Threads ===

    pub async fn thread(&self, thread_id: &str) -> DorksResult<Thread> {
        let response: ThreadResponse = self
            .call(endpoint::THREAD, &[("thread_id", thread_id)], None)
            .await?;
        Ok(response.thread)
    }

    /// Threads the current user has joined in this community.
    pub async fn joined_threads(&self, start: u32, size: u32) -> DorksResult<Vec<Thread>> {
        let (start, size) = (start.to_string(), size.to_string());
        let response: ThreadListResponse = self
            .call(
                endpoint::JOINED_THREADS,
                &[("start", &start), ("size", &size)],
                None,
            )
            .await?;
        Ok(response.thread_list)
    }

    pub async fn join_thread(&self, thread_id: &str) -> DorksResult<ResponseEnvelope> {
        self.call(endpoint::JOIN_THREAD, &[("thread_id", thread_id)], None)
            .await
    }

    pub async fn leave_thread(&self, thread_id: &str) -> DorksResult<ResponseEnvelope> {
        self.call(endpoint::LEAVE_THREAD, &[("thread_id", thread_id)], None)
            .await
    }

    /// Sends a plain text message.
    pub async fn send_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> DorksResult<Option<ChatMessage>> {
        let now = timestamp();
        let body = json!({
            "type": 0,
            "content": content,
            "attachedObject": null,
            "clientRefId": now % 1_000_000_000,
            "timestamp": now,
            "uid": self.user_id(),
            "extensions": {"mentionedArray": []},
        });
        let response: MessageResponse = self
            .call(endpoint::SEND_MESSAGE, &[("thread_id", thread_id)], Some(body))
            .await?;
        Ok(response.message)
    }

    /// Latest `size` messages of a thread.
    pub async fn messages(&self, thread_id: &str, size: u32) -> DorksResult<MessagePage> {
        let size = size.to_string();
        self.call(
            endpoint::MESSAGES,
            &[("thread_id", thread_id), ("size", &size)],
            None,
        )
        .await
    }

    pub async fn delete_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> DorksResult<ResponseEnvelope> {
        self.call(
            endpoint::DELETE_MESSAGE,
            &[("thread_id", thread_id), ("message_id", message_id)],
            None,
        )
        .await
    }

    /// Tips `coins` to a thread. Returns the transaction id used.
    pub async fn tip_thread(&self, thread_id: &str, coins: u32) -> DorksResult<String> {
        let transaction_id = self.transport().signer().new_transaction_id()?.to_string();
        let body = json!({
            "coins": coins,
            "tippingContext": {"transactionId": transaction_id},
            "timestamp": timestamp(),
        });
        let _: ResponseEnvelope = self
            .call(endpoint::TIP_THREAD, &[("thread_id", thread_id)], Some(body))
            .await?;

        info!(thread_id, coins, transaction_id = %transaction_id, "Tipped thread");
        Ok(transaction_id)
    }

    // === Users ===

    /// Profile of `user_id`, global or in the current community.
    pub async fn user(&self, user_id: &str) -> DorksResult<User> {
        let response: UserProfileResponse = self
            .call(endpoint::USER_PROFILE, &[("user_id", user_id)], None)
            .await?;
        Ok(response.user_profile)
    }

    // === Communities ===

    pub async fn joined_communities(&self, start: u32, size: u32) -> DorksResult<Vec<Community>> {
        let (start, size) = (start.to_string(), size.to_string());
        let response: CommunityListResponse = self
            .call(
                endpoint::JOINED_COMMUNITIES,
                &[("start", &start), ("size", &size)],
                None,
            )
            .await?;
        Ok(response.community_list)
    }

    pub async fn join_community(&self, ndc_id: i64) -> DorksResult<ResponseEnvelope> {
        let body = json!({"timestamp": timestamp()});
        self.as_community(ndc_id)
            .call(endpoint::JOIN_COMMUNITY, &[], Some(body))
            .await
    }

    pub async fn leave_community(&self, ndc_id: i64) -> DorksResult<ResponseEnvelope> {
        self.as_community(ndc_id)
            .call(endpoint::LEAVE_COMMUNITY, &[], None)
            .await
    }

    // === Wallet, media, links ===

    pub async fn wallet(&self) -> DorksResult<Wallet> {
        let response: WalletResponse = self.call(endpoint::WALLET, &[], None).await?;
        Ok(response.wallet)
    }

    /// Uploads a media file and returns its URL.
    pub async fn upload_media(&self, data: Vec<u8>, content_type: &str) -> DorksResult<String> {
        let path = endpoint::MEDIA_UPLOAD.render(self.ndc_id(), None, &[])?;
        let response: MediaUploadResponse = self
            .checked(self.transport().post_bytes(&path, data, content_type))
            .await?;
        Ok(response.media_value)
    }

    /// Resolves a share link or link code.
    pub async fn resolve_link(&self, link: &str) -> DorksResult<LinkInfo> {
        let query: String = form_urlencoded::byte_serialize(link.as_bytes()).collect();
        let response: LinkResolutionResponse = self
            .call(endpoint::LINK_RESOLUTION, &[("q", &query)], None)
            .await?;
        Ok(response.link_info_v2)
    }

    /// Resolves a community share link to its community.
    pub async fn resolve_community(&self, link: &str) -> DorksResult<Community> {
        let info = self.resolve_link(link).await?;
        let community = info.community().ok_or(DorksError::NotACommunityLink)?;
        serde_json::from_value(community.clone())
            .map_err(|e| NetworkError::MalformedResponse(e.to_string()).into())
    }
}
