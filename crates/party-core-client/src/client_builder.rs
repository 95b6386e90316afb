// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use tracing::warn;

use crate::app::deps::{
    AppContext, ClientInfo, DynConnectedPartiesRepository, DynIDProvider, DynInvitesRepository,
    DynPartyPresenceService, DynPartyTransport,
};
use crate::app::event_handlers::{ClientEventDispatcher, PartiesEventHandler};
use crate::app::services::{InvitesService, PartiesService};
use crate::client::ClientInner;
use crate::domain::parties::models::PartyJoinInfo;
use crate::domain::parties::repos::PendingOperationsRepository;
use crate::domain::parties::services::impls::{
    PartiesDomainService, PartiesDomainServiceDependencies,
};
use crate::domain::parties::services::PartyTransport;
use crate::infra::parties::{InMemoryInvitesRepository, InMemoryPartiesRepository};
use crate::infra::presence::InMemoryPartyPresenceService;
use crate::util::NanoIDProvider;
use crate::{Client, ClientDelegate};

pub struct UndefinedTransport;

pub struct ClientBuilder<T> {
    transport: T,
    client_info: ClientInfo,
    parties_repo: Option<DynConnectedPartiesRepository>,
    invites_repo: Option<DynInvitesRepository>,
    presence_service: Option<DynPartyPresenceService>,
    id_provider: Option<DynIDProvider>,
    delegates: Vec<Arc<dyn ClientDelegate>>,
    command_line_invite_token: Option<String>,
}

impl ClientBuilder<UndefinedTransport> {
    pub(crate) fn new() -> Self {
        Self {
            transport: UndefinedTransport,
            client_info: ClientInfo::default(),
            parties_repo: None,
            invites_repo: None,
            presence_service: None,
            id_provider: None,
            delegates: Vec::new(),
            command_line_invite_token: None,
        }
    }

    pub fn set_transport(self, transport: Arc<dyn PartyTransport>) -> ClientBuilder<DynPartyTransport> {
        ClientBuilder {
            transport,
            client_info: self.client_info,
            parties_repo: self.parties_repo,
            invites_repo: self.invites_repo,
            presence_service: self.presence_service,
            id_provider: self.id_provider,
            delegates: self.delegates,
            command_line_invite_token: self.command_line_invite_token,
        }
    }
}

impl<T> ClientBuilder<T> {
    pub fn set_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }

    pub fn set_parties_repository(mut self, repo: DynConnectedPartiesRepository) -> Self {
        self.parties_repo = Some(repo);
        self
    }

    pub fn set_invites_repository(mut self, repo: DynInvitesRepository) -> Self {
        self.invites_repo = Some(repo);
        self
    }

    pub fn set_presence_service(mut self, service: DynPartyPresenceService) -> Self {
        self.presence_service = Some(service);
        self
    }

    pub fn set_id_provider(mut self, provider: DynIDProvider) -> Self {
        self.id_provider = Some(provider);
        self
    }

    pub fn add_delegate(mut self, delegate: Arc<dyn ClientDelegate>) -> Self {
        self.delegates.push(delegate);
        self
    }

    /// A join-info token captured from the command line at process start.
    /// Consumed via `PartiesService::consume_pending_command_line_invite`.
    pub fn set_command_line_invite_token(mut self, token: impl Into<String>) -> Self {
        self.command_line_invite_token = Some(token.into());
        self
    }
}

impl ClientBuilder<DynPartyTransport> {
    pub fn build(self) -> Client {
        let ctx = Arc::new(AppContext::new(self.client_info));

        if let Some(token) = &self.command_line_invite_token {
            match PartyJoinInfo::from_token(token) {
                Ok(join_info) => ctx.set_pending_command_line_invite(join_info),
                Err(error) => {
                    warn!(%error, "Discarding malformed command-line invite token")
                }
            }
        }

        let parties_repo = self
            .parties_repo
            .unwrap_or_else(|| Arc::new(InMemoryPartiesRepository::new()));
        let invites_repo = self
            .invites_repo
            .unwrap_or_else(|| Arc::new(InMemoryInvitesRepository::new()));
        let presence_service = self
            .presence_service
            .unwrap_or_else(|| Arc::new(InMemoryPartyPresenceService::new()));
        let id_provider = self
            .id_provider
            .unwrap_or_else(|| Arc::new(NanoIDProvider));
        let pending_ops_repo = Arc::new(PendingOperationsRepository::new());
        let client_event_dispatcher = Arc::new(ClientEventDispatcher::new());

        for delegate in self.delegates {
            client_event_dispatcher.subscribe(delegate);
        }

        let parties_domain_service = Arc::new(PartiesDomainService::new(
            PartiesDomainServiceDependencies {
                ctx: ctx.clone(),
                client_event_dispatcher: client_event_dispatcher.clone(),
                id_provider,
                invites_repo: invites_repo.clone(),
                parties_repo: parties_repo.clone(),
                pending_ops_repo,
                presence_service: presence_service.clone(),
                transport: self.transport,
            },
        ));

        let client_inner = Arc::new(ClientInner {
            parties: PartiesService {
                ctx: ctx.clone(),
                parties_repo,
                presence_service,
                parties_domain_service: parties_domain_service.clone(),
            },
            invites: InvitesService {
                invites_repo,
                parties_domain_service: parties_domain_service.clone(),
            },
            ctx,
            event_handler: PartiesEventHandler::new(parties_domain_service),
            client_event_dispatcher: client_event_dispatcher.clone(),
        });

        client_event_dispatcher.set_client(Arc::downgrade(&client_inner));
        Client::from(client_inner)
    }
}
